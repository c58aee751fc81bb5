use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DataStruct, DeriveInput, Fields, Visibility};

use crate::attrs::FieldAttrs;

/// Generate `Record` and `FieldType` for a struct with named fields.
pub(crate) fn derive_record(input: &DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => &named.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs with named fields",
            ))
        }
    };

    let krate = quote!(::structmapper);
    let ident = &input.ident;
    let record_name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut schema_fields = Vec::with_capacity(fields.len());
    let mut get_arms = Vec::new();
    let mut json_arms = Vec::new();
    let mut set_arms = Vec::new();
    let mut embedded_arms = Vec::new();
    let mut embedded_mut_arms = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        let Some(member) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let name = member.unraw().to_string();
        let ty = &field.ty;

        // private fields are never touched, so their types need no bounds
        if matches!(field.vis, Visibility::Inherited) {
            let kind = if attrs.is_embedded() {
                quote!(#krate::Kind::Record)
            } else {
                quote!(#krate::Kind::Any)
            };
            schema_fields.push(quote! {
                #krate::Field::new(#name, #kind).internal()
            });
            continue;
        }

        if attrs.is_embedded() {
            schema_fields.push(quote! {
                #krate::Field::embedded(#name, #krate::Record::schema(&self.#member))
            });
            embedded_arms.push(quote! {
                #index => ::core::option::Option::Some(&self.#member as &dyn #krate::Record)
            });
            embedded_mut_arms.push(quote! {
                #index => ::core::option::Option::Some(&mut self.#member as &mut dyn #krate::Record)
            });
            continue;
        }

        let tag = attrs.primary_directive();
        let override_tag = attrs
            .override_directive()
            .map(|directive| quote!(.override_tag(#directive)));
        schema_fields.push(quote! {
            #krate::Field::new(#name, <#ty as #krate::FieldType>::kind())
                .tag(#tag)
                #override_tag
        });
        get_arms.push(quote! {
            #index => #krate::__private::to_field_value(#name, &self.#member)
        });
        json_arms.push(quote! {
            #index => #krate::__private::to_field_json(#name, &self.#member)
        });
        set_arms.push(quote! {
            #index => {
                self.#member = #krate::__private::from_field_value(#name, value)?;
                ::core::result::Result::Ok(())
            }
        });
    }

    Ok(quote! {
        impl #impl_generics #krate::Record for #ident #ty_generics #where_clause {
            fn schema(&self) -> #krate::Schema {
                #krate::Schema::new(#record_name)
                    #(.field(#schema_fields))*
            }

            fn field_value(
                &self,
                index: usize,
            ) -> #krate::Result<#krate::__private::Value> {
                match index {
                    #(#get_arms,)*
                    _ => ::core::result::Result::Err(#krate::Error::no_such_field(#record_name, index)),
                }
            }

            fn field_json(&self, index: usize) -> #krate::Result<::std::string::String> {
                match index {
                    #(#json_arms,)*
                    _ => ::core::result::Result::Err(#krate::Error::no_such_field(#record_name, index)),
                }
            }

            fn set_field_value(
                &mut self,
                index: usize,
                value: #krate::__private::Value,
            ) -> #krate::Result<()> {
                match index {
                    #(#set_arms)*
                    _ => {
                        let _ = value;
                        ::core::result::Result::Err(#krate::Error::no_such_field(#record_name, index))
                    }
                }
            }

            fn embedded(&self, index: usize) -> ::core::option::Option<&dyn #krate::Record> {
                match index {
                    #(#embedded_arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            fn embedded_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn #krate::Record> {
                match index {
                    #(#embedded_mut_arms,)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics #krate::FieldType for #ident #ty_generics #where_clause {
            fn kind() -> #krate::Kind {
                #krate::Kind::Record
            }
        }
    })
}
