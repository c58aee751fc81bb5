//! Record schemas.
//!
//! A [`Schema`] is the ordered field table of a record type. It is built per
//! conversion call from a [`Record`], usually by `#[derive(Record)]`, and
//! drives both the encoder and the decoder.

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde_json::Value;

use crate::error::{Error, Result};

/// The value kind of a field, which selects its string encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Copied verbatim.
    Text,
    /// JSON encoded, decoded by truthiness inference.
    Bool,
    Integer,
    Float,
    /// RFC 3339 string, empty for the zero timestamp.
    Timestamp,
    List(Box<Kind>),
    Map,
    /// A nested record stored as one JSON object under a single key.
    Record,
    /// A value that may be absent (`Option<T>`).
    Optional(Box<Kind>),
    /// Any JSON value.
    Any,
}

impl Kind {
    pub fn list(item: Kind) -> Self {
        Kind::List(Box::new(item))
    }

    pub fn optional(inner: Kind) -> Self {
        Kind::Optional(Box::new(inner))
    }

    /// Timestamps and optional timestamps share the RFC 3339 encoding.
    pub fn is_timestamp(&self) -> bool {
        match self {
            Kind::Timestamp => true,
            Kind::Optional(inner) => **inner == Kind::Timestamp,
            _ => false,
        }
    }

    /// A list of text, the only kind with a comma-split fallback.
    pub fn is_text_list(&self) -> bool {
        matches!(self, Kind::List(item) if **item == Kind::Text)
    }
}

/// Describes one declared field of a record.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    kind: Kind,
    tag: String,
    override_tag: Option<String>,
    exported: bool,
    embedded: Option<Schema>,
}

impl Field {
    /// A visible field with an empty directive.
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            tag: String::new(),
            override_tag: None,
            exported: true,
            embedded: None,
        }
    }

    /// An embedded record whose fields are promoted into the parent.
    pub fn embedded(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            embedded: Some(schema),
            ..Self::new(name, Kind::Record)
        }
    }

    /// Set the primary naming directive.
    pub fn tag(mut self, directive: impl Into<String>) -> Self {
        self.tag = directive.into();
        self
    }

    /// Set the mapper-specific directive, which takes precedence over the
    /// primary one.
    pub fn override_tag(mut self, directive: impl Into<String>) -> Self {
        self.override_tag = Some(directive.into());
        self
    }

    /// Mark the field internal: it is never read or written.
    pub fn internal(mut self) -> Self {
        self.exported = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn primary_tag(&self) -> &str {
        &self.tag
    }

    pub fn override_directive(&self) -> Option<&str> {
        self.override_tag.as_deref()
    }

    pub fn is_exported(&self) -> bool {
        self.exported
    }

    pub fn embedded_schema(&self) -> Option<&Schema> {
        self.embedded.as_ref()
    }
}

/// The ordered field table of a record type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field. Declaration order is preserved.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Maps a Rust type to the [`Kind`] of a field holding it.
///
/// `#[derive(Record)]` implements this for the record itself with
/// [`Kind::Record`], so records nest inside other records.
pub trait FieldType {
    fn kind() -> Kind;
}

macro_rules! impl_field_type {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl FieldType for $ty {
                fn kind() -> Kind {
                    $kind
                }
            }
        )+
    };
}

impl_field_type!(Kind::Text => String);
impl_field_type!(Kind::Bool => bool);
impl_field_type!(Kind::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_field_type!(Kind::Float => f32, f64);
impl_field_type!(Kind::Any => Value);

impl<Tz: chrono::TimeZone> FieldType for chrono::DateTime<Tz> {
    fn kind() -> Kind {
        Kind::Timestamp
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn kind() -> Kind {
        Kind::optional(T::kind())
    }
}

impl<T: FieldType> FieldType for Box<T> {
    fn kind() -> Kind {
        T::kind()
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn kind() -> Kind {
        Kind::list(T::kind())
    }
}

impl<T: FieldType> FieldType for VecDeque<T> {
    fn kind() -> Kind {
        Kind::list(T::kind())
    }
}

impl<K, V, S> FieldType for HashMap<K, V, S> {
    fn kind() -> Kind {
        Kind::Map
    }
}

impl<K, V> FieldType for BTreeMap<K, V> {
    fn kind() -> Kind {
        Kind::Map
    }
}

/// A typed record that can be flattened into a string map.
///
/// Field indices are positions in [`Record::schema`]. Implementations only
/// need to serve exported fields: value accessors for plain fields and the
/// `embedded` accessors for embedded records.
///
/// Derive it:
///
/// ```
/// use structmapper::Record;
///
/// #[derive(Record)]
/// pub struct Fish {
///     #[sm("tuna")]
///     pub tuna: String,
///     #[sm("favnum,omitempty")]
///     pub fav_number: i64,
/// }
/// ```
pub trait Record {
    /// The field table of this record, in declaration order.
    fn schema(&self) -> Schema;

    /// The JSON form of a plain field.
    fn field_value(&self, index: usize) -> Result<Value>;

    /// The JSON text of a plain field, rendered from its typed value.
    ///
    /// The default goes through [`Record::field_value`], which loses
    /// precision for `f32` and reorders nested objects. The derive overrides
    /// it.
    fn field_json(&self, index: usize) -> Result<String> {
        let value = self.field_value(index)?;
        serde_json::to_string(&value).map_err(|e| {
            let schema = self.schema();
            let name = schema.fields().get(index).map_or("?", Field::name);
            Error::encode(name, e)
        })
    }

    /// Assign a plain field from its JSON form.
    fn set_field_value(&mut self, index: usize, value: Value) -> Result<()>;

    /// The embedded record at `index`, if that field is one.
    fn embedded(&self, index: usize) -> Option<&dyn Record>;

    fn embedded_mut(&mut self, index: usize) -> Option<&mut dyn Record>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};

    #[test]
    fn kinds_of_std_types() {
        assert_eq!(String::kind(), Kind::Text);
        assert_eq!(bool::kind(), Kind::Bool);
        assert_eq!(u16::kind(), Kind::Integer);
        assert_eq!(f32::kind(), Kind::Float);
        assert_eq!(<Vec<String>>::kind(), Kind::list(Kind::Text));
        assert_eq!(<Option<i32>>::kind(), Kind::optional(Kind::Integer));
        assert_eq!(<HashMap<String, u8>>::kind(), Kind::Map);
        assert_eq!(<Box<f64>>::kind(), Kind::Float);
    }

    #[test]
    fn timestamp_kinds() {
        assert!(<DateTime<Utc>>::kind().is_timestamp());
        assert!(<DateTime<FixedOffset>>::kind().is_timestamp());
        assert!(<Option<DateTime<Utc>>>::kind().is_timestamp());
        assert!(!<Vec<DateTime<Utc>>>::kind().is_timestamp());
    }

    #[test]
    fn text_list_detection() {
        assert!(<Vec<String>>::kind().is_text_list());
        assert!(!<Vec<i32>>::kind().is_text_list());
        assert!(!<Option<Vec<String>>>::kind().is_text_list());
    }

    #[test]
    fn schema_preserves_declaration_order() {
        let schema = Schema::new("Fish")
            .field(Field::new("b", Kind::Text))
            .field(Field::new("a", Kind::Integer).internal())
            .field(Field::embedded("base", Schema::new("Base")));

        let names: Vec<&str> = schema.fields().iter().map(Field::name).collect();
        assert_eq!(names, ["b", "a", "base"]);
        assert!(!schema.fields()[1].is_exported());
        assert!(schema.fields()[2].embedded_schema().is_some());
        assert_eq!(schema.fields()[2].kind(), &Kind::Record);
    }
}
