//! Schema-driven records over JSON objects.
//!
//! [`DynamicRecord`] pairs a hand-built [`Schema`] with a JSON object so
//! documents without a Rust type can go through the same conversions.
//! Embedded records are nested objects stored under the embedding field's
//! name.

use serde_json::{Map, Value};

use crate::decode::{from_string_map, Mode};
use crate::encode::to_string_map;
use crate::error::{Error, Result};
use crate::schema::{Record, Schema};
use crate::StringMap;

#[derive(Clone, Debug, PartialEq)]
enum Slot {
    Value(Value),
    Embedded(DynamicRecord),
}

/// A record whose fields live in a JSON object.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicRecord {
    schema: Schema,
    slots: Vec<Slot>,
}

impl DynamicRecord {
    /// Bind `value` to `schema`. Fails when `value`, or the value of any
    /// embedded field, is not a JSON object.
    pub fn from_json(schema: Schema, value: Value) -> Result<Self> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(Error::invalid_argument(format!(
                    "{} must be a JSON object, found {}",
                    schema.name(),
                    kind_name(&other)
                )))
            }
        };

        let mut slots = Vec::with_capacity(schema.len());
        for field in schema.fields() {
            let value = object.remove(field.name()).unwrap_or(Value::Null);
            let slot = match field.embedded_schema() {
                Some(embedded) => {
                    let value = match value {
                        Value::Null => Value::Object(Map::new()),
                        other => other,
                    };
                    Slot::Embedded(Self::from_json(embedded.clone(), value)?)
                }
                None => Slot::Value(value),
            };
            slots.push(slot);
        }

        Ok(Self { schema, slots })
    }

    /// The JSON object form, fields keyed by declared name.
    pub fn into_json(self) -> Value {
        let object = self
            .schema
            .fields()
            .iter()
            .zip(self.slots)
            .map(|(field, slot)| {
                let value = match slot {
                    Slot::Value(value) => value,
                    Slot::Embedded(record) => record.into_json(),
                };
                (field.name().to_string(), value)
            })
            .collect();
        Value::Object(object)
    }

    fn slot(&self, index: usize) -> Result<&Slot> {
        self.slots
            .get(index)
            .ok_or_else(|| Error::no_such_field(self.schema.name(), index))
    }
}

impl Record for DynamicRecord {
    fn schema(&self) -> Schema {
        self.schema.clone()
    }

    fn field_value(&self, index: usize) -> Result<Value> {
        match self.slot(index)? {
            Slot::Value(value) => Ok(value.clone()),
            Slot::Embedded(_) => Err(Error::no_such_field(self.schema.name(), index)),
        }
    }

    fn set_field_value(&mut self, index: usize, value: Value) -> Result<()> {
        match self.slots.get_mut(index) {
            Some(Slot::Value(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(Error::no_such_field(self.schema.name(), index)),
        }
    }

    fn embedded(&self, index: usize) -> Option<&dyn Record> {
        match self.slots.get(index) {
            Some(Slot::Embedded(record)) => Some(record as &dyn Record),
            _ => None,
        }
    }

    fn embedded_mut(&mut self, index: usize) -> Option<&mut dyn Record> {
        match self.slots.get_mut(index) {
            Some(Slot::Embedded(record)) => Some(record as &mut dyn Record),
            _ => None,
        }
    }
}

/// Encode a JSON object described by `schema`.
///
/// Anything other than an object is rejected as an invalid argument.
pub fn encode_json(schema: &Schema, value: &Value) -> Result<StringMap> {
    let record = DynamicRecord::from_json(schema.clone(), value.clone())?;
    to_string_map(&record)
}

/// Overlay `mapping` onto a JSON object described by `schema`.
///
/// A missing mapping (`None`) is rejected, unlike an empty one, which
/// leaves `value` as it is.
pub fn decode_json(
    mapping: Option<&StringMap>,
    schema: &Schema,
    value: &mut Value,
    mode: Mode,
) -> Result<()> {
    let mapping = mapping.ok_or_else(|| Error::invalid_argument("mapping must not be nil"))?;
    let mut record = DynamicRecord::from_json(schema.clone(), value.clone())?;
    let result = from_string_map(mapping, &mut record, mode);
    *value = record.into_json();
    result
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, Kind};
    use collection_literals::btree;
    use serde_json::json;

    fn schema() -> Schema {
        let base = Schema::new("Base").field(Field::new("Id", Kind::Integer).tag("id"));
        Schema::new("Fish")
            .field(Field::embedded("Base", base))
            .field(Field::new("Tuna", Kind::Text).tag("tuna"))
            .field(Field::new("Songs", Kind::list(Kind::Text)).tag("songs,omitempty"))
            .field(Field::new("Secret", Kind::Text).internal())
    }

    #[test]
    fn encodes_json_objects() {
        let value = json!({"Base": {"Id": 7}, "Tuna": "hello", "Songs": [], "Secret": "x"});
        let map = encode_json(&schema(), &value).unwrap();

        let expected: StringMap = btree! {
            "id".into() => "7".into(),
            "tuna".into() => "hello".into(),
        };
        assert_eq!(map, expected);
    }

    #[test]
    fn non_objects_are_invalid_arguments() {
        let err = encode_json(&schema(), &json!("not a record")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert!(err.to_string().contains("a string"));

        let err = encode_json(&schema(), &json!({"Base": 3})).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn missing_mapping_is_rejected() {
        let mut value = json!({"Tuna": "hello"});
        let err = decode_json(None, &schema(), &mut value, Mode::Strict).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert_eq!(value, json!({"Tuna": "hello"}));
    }

    #[test]
    fn empty_mapping_changes_nothing() {
        let mut value = json!({"Base": {"Id": 1}, "Tuna": "a", "Songs": ["x"], "Secret": "s"});
        let before = value.clone();
        decode_json(Some(&StringMap::new()), &schema(), &mut value, Mode::Strict).unwrap();
        assert_eq!(value, before);
    }

    #[test]
    fn decodes_into_nested_objects() {
        let mapping: StringMap = btree! {
            "id".into() => "42".into(),
            "songs".into() => "a, b".into(),
            "Secret".into() => "leaked".into(),
        };
        let mut value = json!({"Tuna": "keep", "Secret": "s"});
        decode_json(Some(&mapping), &schema(), &mut value, Mode::Lenient).unwrap();

        assert_eq!(
            value,
            json!({"Base": {"Id": 42}, "Tuna": "keep", "Songs": ["a", "b"], "Secret": "s"})
        );
    }
}
