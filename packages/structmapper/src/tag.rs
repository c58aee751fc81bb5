//! Naming directives.
//!
//! A directive is a comma separated string attached to a field. The first
//! segment names the external key (empty means "use the declared name"), a
//! second segment of `omitempty` drops the field when its value is empty.
//! `-` alone drops the field always, and `-,` names a key that is literally
//! `-`.

use crate::schema::Field;

/// Directive option that drops empty values on encode.
pub const OMIT_EMPTY: &str = "omitempty";

/// The resolved form of a naming directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    /// External key. Empty when `omit` is set.
    pub key: String,
    /// Drop the field on encode when its value is empty.
    pub omit_empty: bool,
    /// Never read or write the field.
    pub omit: bool,
}

/// Resolve a directive for a field declared as `declared_name`.
///
/// Never fails: malformed directives fall back to defaults.
///
/// ```
/// use structmapper::tag::resolve;
///
/// let tag = resolve("Cake", "tuna,omitempty");
/// assert_eq!(tag.key, "tuna");
/// assert!(tag.omit_empty);
///
/// assert_eq!(resolve("Cake", "").key, "Cake");
/// ```
pub fn resolve(declared_name: &str, directive: &str) -> Tag {
    if directive == "-" {
        return Tag {
            key: String::new(),
            omit_empty: false,
            omit: true,
        };
    }
    if directive == "-," {
        return Tag {
            key: "-".to_string(),
            omit_empty: false,
            omit: false,
        };
    }

    let mut segments = directive.split(',');
    let name = segments.next().unwrap_or_default();
    let omit_empty = segments.next() == Some(OMIT_EMPTY);
    let key = if name.is_empty() { declared_name } else { name };

    Tag {
        key: key.to_string(),
        omit_empty,
        omit: false,
    }
}

/// Resolve the effective directive of a field.
///
/// The mapper-specific override wins when present and non-empty, otherwise
/// the primary directive applies.
pub fn resolve_field(field: &Field) -> Tag {
    let directive = match field.override_directive() {
        Some(directive) if !directive.is_empty() => directive,
        _ => field.primary_tag(),
    };
    resolve(field.name(), directive)
}
