//! Typed records <-> flat string maps
//!
//! Hash-based stores keep flat `string -> string` pairs. This crate converts
//! typed records to that form and back:
//!
//! - `to_string_map`: one entry per visible field, text verbatim, timestamps
//!   as RFC 3339, everything else as JSON
//! - `from_string_map`: the inverse, with a `Mode` switch controlling how
//!   non-JSON input is coerced
//! - `#[derive(Record)]`: builds the field table from the struct definition
//!
//! # Naming directives
//!
//! | Directive | Key | omit when empty | omit always |
//! |---|---|---|---|
//! | `""` | field name | no | no |
//! | `"name"` | `name` | no | no |
//! | `"name,omitempty"` | `name` | yes | no |
//! | `",omitempty"` | field name | yes | no |
//! | `"-"` | | | yes |
//! | `"-,"` | `-` | no | no |
//!
//! The derive reads the primary directive from serde attributes (`rename`,
//! `skip_serializing_if`, `skip`) and lets `#[sm("...")]` override it.
//! Only `pub` fields are mapped. `#[sm(embed)]` or `#[serde(flatten)]`
//! promotes the fields of an embedded record into the parent.
//!
//! # Example
//!
//! ```rust
//! use structmapper::{from_string_map, to_string_map, Mode, Record};
//!
//! #[derive(Record, Debug, Default, PartialEq)]
//! pub struct Fish {
//!     #[sm("tuna")]
//!     pub tuna: String,
//!     #[sm("songs")]
//!     pub songs: Vec<String>,
//!     #[sm("favnum")]
//!     pub fav_number: i64,
//!     #[sm("temp")]
//!     pub temperature: f64,
//!     #[sm("candy")]
//!     pub like_candy: bool,
//! }
//!
//! let fish = Fish {
//!     tuna: "hello".into(),
//!     songs: vec!["hi".into(), "nice".into()],
//!     fav_number: 2,
//!     temperature: 20.5,
//!     like_candy: true,
//! };
//!
//! let map = to_string_map(&fish)?;
//! assert_eq!(map["songs"], r#"["hi","nice"]"#);
//! assert_eq!(map["temp"], "20.5");
//!
//! let mut back = Fish::default();
//! from_string_map(&map, &mut back, Mode::Strict)?;
//! assert_eq!(back, fish);
//! # Ok::<(), structmapper::Error>(())
//! ```

// Lets `#[derive(Record)]` output (`::structmapper::...`) resolve inside this crate.
extern crate self as structmapper;

use std::collections::BTreeMap;

pub mod coerce;
mod decode;
mod dynamic;
mod encode;
mod error;
mod schema;
pub mod tag;
pub mod walk;

pub use decode::{convert, from_string_map, Decoder, Intermediate, Mode};
pub use dynamic::{decode_json, encode_json, DynamicRecord};
pub use encode::{is_empty, to_string_map};
pub use error::{Error, Result};
pub use schema::{Field, FieldType, Kind, Record, Schema};

#[cfg(feature = "derive")]
pub use structmapper_derive::Record;

/// The flat form of a record.
pub type StringMap = BTreeMap<String, String>;

#[doc(hidden)]
pub mod __private {
    use serde::de::DeserializeOwned;
    use serde::Serialize;

    use crate::error::{Error, Result};

    pub use serde_json::Value;

    pub fn to_field_value<T: Serialize + ?Sized>(field: &str, value: &T) -> Result<Value> {
        serde_json::to_value(value).map_err(|e| Error::encode(field, e))
    }

    pub fn to_field_json<T: Serialize + ?Sized>(field: &str, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| Error::encode(field, e))
    }

    pub fn from_field_value<T: DeserializeOwned>(field: &str, value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|e| Error::decode(field, e))
    }
}
