//! Field attribute parsing.
//!
//! Two attribute families feed a field's naming directive: serde's own
//! (`rename`, `skip`, `skip_serializing_if`, `flatten`), which form the
//! primary directive, and `#[sm(...)]`, which overrides it.

use syn::meta::ParseNestedMeta;
use syn::parse::ParseStream;
use syn::{Attribute, Ident, LitStr, Token};

#[derive(Debug, Default)]
pub(crate) struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
    omit_empty: bool,
    flatten: bool,
    embed: bool,
    directive: Option<String>,
}

impl FieldAttrs {
    pub(crate) fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs {
            if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| parsed.parse_serde(meta))?;
            } else if attr.path().is_ident("sm") {
                attr.parse_args_with(|input: ParseStream| parsed.parse_sm(input))?;
            }
        }
        Ok(parsed)
    }

    fn parse_serde(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("rename") {
            if meta.input.peek(Token![=]) {
                let name: LitStr = meta.value()?.parse()?;
                self.rename = Some(name.value());
            } else {
                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("serialize") {
                        let name: LitStr = inner.value()?.parse()?;
                        self.rename = Some(name.value());
                        Ok(())
                    } else {
                        skip_meta(inner)
                    }
                })?;
            }
        } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
            self.skip = true;
        } else if meta.path.is_ident("skip_serializing_if") {
            let _: LitStr = meta.value()?.parse()?;
            self.omit_empty = true;
        } else if meta.path.is_ident("flatten") {
            self.flatten = true;
        } else {
            skip_meta(meta)?;
        }
        Ok(())
    }

    fn parse_sm(&mut self, input: ParseStream) -> syn::Result<()> {
        if input.peek(LitStr) {
            let directive: LitStr = input.parse()?;
            self.directive = Some(directive.value());
            return Ok(());
        }

        let ident: Ident = input.parse()?;
        if ident != "embed" {
            return Err(syn::Error::new(
                ident.span(),
                "expected a directive string or `embed`",
            ));
        }
        self.embed = true;
        Ok(())
    }

    /// Whether the field's own fields are promoted into the parent.
    pub(crate) fn is_embedded(&self) -> bool {
        self.embed || self.flatten
    }

    /// The primary directive synthesized from serde attributes.
    pub(crate) fn primary_directive(&self) -> String {
        if self.skip {
            return "-".to_string();
        }
        let name = self.rename.clone().unwrap_or_default();
        match (name.as_str(), self.omit_empty) {
            (_, true) => format!("{},omitempty", name),
            ("-", false) => "-,".to_string(),
            (_, false) => name,
        }
    }

    /// The `#[sm("...")]` override, if any.
    pub(crate) fn override_directive(&self) -> Option<&str> {
        self.directive.as_deref()
    }
}

/// Consume a serde option this derive does not care about.
fn skip_meta(meta: ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(skip_meta)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn field_attrs(field: syn::Field) -> FieldAttrs {
        FieldAttrs::parse(&field.attrs).unwrap()
    }

    fn named_field(tokens: syn::FieldsNamed) -> syn::Field {
        tokens.named.into_iter().next().unwrap()
    }

    #[test]
    fn plain_field_has_empty_directive() {
        let attrs = field_attrs(named_field(parse_quote!({ pub a: String })));
        assert_eq!(attrs.primary_directive(), "");
        assert_eq!(attrs.override_directive(), None);
        assert!(!attrs.is_embedded());
    }

    #[test]
    fn serde_attributes_form_the_primary_directive() {
        let attrs = field_attrs(named_field(parse_quote!({
            #[serde(rename = "tuna", skip_serializing_if = "String::is_empty", default)]
            pub a: String
        })));
        assert_eq!(attrs.primary_directive(), "tuna,omitempty");

        let attrs = field_attrs(named_field(parse_quote!({
            #[serde(skip)]
            pub a: String
        })));
        assert_eq!(attrs.primary_directive(), "-");

        let attrs = field_attrs(named_field(parse_quote!({
            #[serde(rename = "-")]
            pub a: String
        })));
        assert_eq!(attrs.primary_directive(), "-,");
    }

    #[test]
    fn serialize_rename_is_used() {
        let attrs = field_attrs(named_field(parse_quote!({
            #[serde(rename(serialize = "out", deserialize = "in"))]
            pub a: String
        })));
        assert_eq!(attrs.primary_directive(), "out");
    }

    #[test]
    fn unrelated_serde_options_are_skipped() {
        let attrs = field_attrs(named_field(parse_quote!({
            #[serde(default, with = "some::module", bound(serialize = "T: Clone"))]
            pub a: String
        })));
        assert_eq!(attrs.primary_directive(), "");
    }

    #[test]
    fn sm_directive_and_embed() {
        let attrs = field_attrs(named_field(parse_quote!({
            #[sm("favnum,omitempty")]
            pub a: i32
        })));
        assert_eq!(attrs.override_directive(), Some("favnum,omitempty"));

        let attrs = field_attrs(named_field(parse_quote!({
            #[sm(embed)]
            pub base: Base
        })));
        assert!(attrs.is_embedded());

        let attrs = field_attrs(named_field(parse_quote!({
            #[serde(flatten)]
            pub base: Base
        })));
        assert!(attrs.is_embedded());
    }

    #[test]
    fn unknown_sm_option_is_an_error() {
        let field = named_field(parse_quote!({
            #[sm(inline)]
            pub a: i32
        }));
        assert!(FieldAttrs::parse(&field.attrs).is_err());
    }
}
