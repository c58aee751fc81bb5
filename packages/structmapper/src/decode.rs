//! String map to record conversion.
//!
//! Decoding happens in two passes. Every mapped field is first parsed into an
//! [`Intermediate`] value; a parse failure aborts before the record is
//! touched. The intermediates are then assigned to their fields through the
//! record's typed accessors, so nested kinds follow serde's rules exactly.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tracing::{debug, trace};

use crate::coerce::{string_to_bool, string_to_list};
use crate::encode::{format_timestamp, parse_timestamp};
use crate::error::{Error, Result};
use crate::schema::{Kind, Record};
use crate::tag::resolve_field;
use crate::walk::{check_keys, locate_mut, visible_fields, Visited};
use crate::StringMap;

/// How strictly non-JSON input is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Malformed structured values are errors.
    #[default]
    Strict,
    /// Malformed text lists are split on commas, other malformed values are
    /// left unset.
    Lenient,
}

/// A parsed mapping value waiting to be assigned to its field.
#[derive(Clone, Debug, PartialEq)]
pub enum Intermediate {
    Text(String),
    Bool(bool),
    Timestamp(DateTime<FixedOffset>),
    Structured(Value),
}

impl Intermediate {
    /// The JSON form handed to the field's typed setter.
    ///
    /// A JSON `null` resets lists, maps and optional values, and leaves any
    /// other kind untouched (`None`).
    pub fn into_field_value(self, kind: &Kind) -> Option<Value> {
        match self {
            Intermediate::Text(s) => Some(Value::String(s)),
            Intermediate::Bool(b) => Some(Value::Bool(b)),
            Intermediate::Timestamp(t) => Some(Value::String(format_timestamp(&t))),
            Intermediate::Structured(Value::Null) => match kind {
                Kind::List(_) => Some(Value::Array(Vec::new())),
                Kind::Map => Some(Value::Object(Default::default())),
                Kind::Optional(_) | Kind::Any => Some(Value::Null),
                _ => None,
            },
            Intermediate::Structured(value) => Some(value),
        }
    }
}

/// Parse one mapping value for a field of `kind`.
///
/// Returns `Ok(None)` when the field should be left unset.
pub fn convert(kind: &Kind, key: &str, raw: &str, mode: Mode) -> Result<Option<Intermediate>> {
    if *kind == Kind::Text {
        return Ok(Some(Intermediate::Text(raw.to_string())));
    }

    if kind.is_timestamp() {
        if raw.is_empty() {
            return Ok(None);
        }
        let timestamp = parse_timestamp(raw)
            .map_err(|e| Error::parse(key, format!("parsing time value: {}", e)))?;
        return Ok(Some(Intermediate::Timestamp(timestamp)));
    }

    // booleans are always coerced, whatever the mode
    if *kind == Kind::Bool {
        return Ok(Some(Intermediate::Bool(string_to_bool(raw))));
    }

    if raw.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => Ok(Some(Intermediate::Structured(value))),
        Err(e) if mode == Mode::Strict => {
            Err(Error::parse(key, format!("json decoding: {}", e)))
        }
        Err(e) if kind.is_text_list() => {
            debug!(key, error = %e, "not JSON, splitting on commas");
            let items = string_to_list(raw).into_iter().map(Value::String).collect();
            Ok(Some(Intermediate::Structured(Value::Array(items))))
        }
        Err(e) => {
            debug!(key, error = %e, "not JSON, leaving field unset");
            Ok(None)
        }
    }
}

/// Overlay a string map onto a record.
///
/// Only fields whose keys are present in `mapping` are assigned; everything
/// else keeps its current value. Booleans are coerced by truthiness in both
/// modes.
///
/// ```
/// use collection_literals::btree;
/// use structmapper::{from_string_map, Mode, Record, StringMap};
///
/// #[derive(Record, Default)]
/// pub struct Fish {
///     #[sm("songs")]
///     pub songs: Vec<String>,
///     #[sm("candy")]
///     pub like_candy: bool,
/// }
///
/// let map: StringMap = btree! {
///     "songs".into() => "hi, nice".into(),
///     "candy".into() => "yes".into(),
/// };
///
/// let mut fish = Fish::default();
/// from_string_map(&map, &mut fish, Mode::Lenient).unwrap();
/// assert_eq!(fish.songs, ["hi", "nice"]);
/// assert!(fish.like_candy);
/// ```
pub fn from_string_map(mapping: &StringMap, record: &mut dyn Record, mode: Mode) -> Result<()> {
    let schema = record.schema();
    check_keys(&schema)?;

    let mut staged: Vec<(Visited<'_>, Intermediate)> = Vec::new();
    for visited in visible_fields(&schema) {
        let tag = resolve_field(visited.field);
        if tag.omit {
            continue;
        }
        let Some(raw) = mapping.get(&tag.key) else {
            continue;
        };
        match convert(visited.field.kind(), &tag.key, raw, mode)? {
            Some(intermediate) => staged.push((visited, intermediate)),
            None => trace!(key = %tag.key, "field left unset"),
        }
    }

    let assigned = staged.len();
    for (visited, intermediate) in staged {
        let Some(value) = intermediate.into_field_value(visited.field.kind()) else {
            continue;
        };
        let (owner, index) = locate_mut(record, &visited.path)?;
        owner.set_field_value(index, value)?;
    }

    debug!(record = schema.name(), fields = assigned, ?mode, "decoded record");
    Ok(())
}

/// A reusable decoder carrying its [`Mode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoder {
    mode: Mode,
}

impl Decoder {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn strict() -> Self {
        Self::new(Mode::Strict)
    }

    pub fn lenient() -> Self {
        Self::new(Mode::Lenient)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn decode(&self, mapping: &StringMap, record: &mut dyn Record) -> Result<()> {
        from_string_map(mapping, record, self.mode)
    }
}
