//! `#[derive(Record)]` for structmapper.
//!
//! Generates the field table (`Record::schema`), typed per-field accessors
//! and a `FieldType` impl so the record can nest inside other records.
//!
//! Field attributes:
//!
//! - `#[serde(rename = "key")]`, `#[serde(skip_serializing_if = "...")]`
//!   and `#[serde(skip)]` form the primary naming directive
//! - `#[sm("key,omitempty")]` overrides it for the string map only
//! - `#[sm(embed)]` or `#[serde(flatten)]` promotes an embedded record's
//!   fields into the parent
//!
//! Fields without `pub` are internal and never mapped.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod expand;

#[proc_macro_derive(Record, attributes(sm, serde))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::derive_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
