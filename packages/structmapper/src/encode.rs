//! Record to string map conversion.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::schema::{Kind, Record};
use crate::tag::resolve_field;
use crate::walk::{check_keys, locate, visible_fields};
use crate::StringMap;

/// Convert a record into a flat string map.
///
/// Text fields are copied verbatim, timestamps are written as RFC 3339 and
/// every other kind is JSON encoded. Fields tagged `-` are skipped, fields
/// tagged `omitempty` are skipped when empty.
///
/// ```
/// use structmapper::{to_string_map, Record};
///
/// #[derive(Record)]
/// pub struct Fish {
///     #[sm("tuna")]
///     pub tuna: String,
///     #[sm("songs")]
///     pub songs: Vec<String>,
/// }
///
/// let fish = Fish { tuna: "hello".into(), songs: vec!["hi".into()] };
/// let map = to_string_map(&fish).unwrap();
/// assert_eq!(map["tuna"], "hello");
/// assert_eq!(map["songs"], r#"["hi"]"#);
/// ```
pub fn to_string_map(record: &dyn Record) -> Result<StringMap> {
    let schema = record.schema();
    check_keys(&schema)?;

    let mut map = StringMap::new();
    for visited in visible_fields(&schema) {
        let tag = resolve_field(visited.field);
        if tag.omit {
            trace!(field = visited.field.name(), "field omitted by directive");
            continue;
        }

        let (owner, index) = locate(record, &visited.path)?;
        let value = owner.field_value(index)?;
        let kind = visited.field.kind();
        if tag.omit_empty && is_empty(kind, &value) {
            trace!(key = %tag.key, "empty field omitted");
            continue;
        }

        let name = visited.field.name();
        let encoded = if *kind == Kind::Text {
            encode_text(name, value)?
        } else if kind.is_timestamp() {
            encode_timestamp(name, &value)?
        } else {
            owner.field_json(index)?
        };
        if encoded.is_empty() && tag.omit_empty {
            trace!(key = %tag.key, "empty encoding omitted");
            continue;
        }
        map.insert(tag.key, encoded);
    }

    debug!(record = schema.name(), keys = map.len(), "encoded record");
    Ok(map)
}

/// Whether a field value counts as empty for `omitempty`.
pub fn is_empty(kind: &Kind, value: &Value) -> bool {
    match (kind, value) {
        (_, Value::Null) => true,
        (Kind::Text, Value::String(s)) => s.is_empty(),
        (Kind::Bool, Value::Bool(b)) => !b,
        (Kind::Integer | Kind::Float, Value::Number(n)) => n.as_f64() == Some(0.0),
        (Kind::Timestamp, Value::String(s)) => parse_timestamp(s).is_ok_and(|t| is_zero(&t)),
        (Kind::List(_), Value::Array(items)) => items.is_empty(),
        (Kind::Map, Value::Object(entries)) => entries.is_empty(),
        _ => false,
    }
}

fn encode_text(field: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Error::encode(field, format!("expected text, found {}", other))),
    }
}

fn encode_timestamp(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => {
            let timestamp = parse_timestamp(s).map_err(|e| Error::encode(field, e))?;
            if is_zero(&timestamp) {
                return Ok(String::new());
            }
            Ok(format_timestamp(&timestamp))
        }
        other => Err(Error::encode(
            field,
            format!("expected an RFC 3339 timestamp, found {}", other),
        )),
    }
}

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s)
}

pub(crate) fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// The zero timestamp is the Unix epoch, the `Default` of chrono's
/// `DateTime`.
fn is_zero(timestamp: &DateTime<FixedOffset>) -> bool {
    timestamp.timestamp() == 0 && timestamp.timestamp_subsec_nanos() == 0
}
