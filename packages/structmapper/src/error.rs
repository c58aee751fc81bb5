//! Error types for record <-> string map conversion.

/// Errors produced while converting records to string maps and back.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The record or mapping handed to an entry point has the wrong shape.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A mapping value could not be parsed for its field's kind.
    #[error("parse error for key {key:?}: {message}")]
    Parse { key: String, message: String },

    /// A field value could not be serialized.
    #[error("encoding field {field:?}: {message}")]
    Encode { field: String, message: String },

    /// A parsed value could not be assigned to its field.
    #[error("decoding field {field:?}: {message}")]
    Decode { field: String, message: String },

    /// Two visible fields resolve to the same external key.
    #[error("duplicate key {key:?} in record {record}")]
    DuplicateKey { record: String, key: String },

    /// A record accessor was asked for a field it does not serve.
    #[error("record {record} has no accessible field at index {index}")]
    NoSuchField { record: String, index: usize },
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn parse(key: impl Into<String>, message: impl ToString) -> Self {
        Error::Parse {
            key: key.into(),
            message: message.to_string(),
        }
    }

    pub fn encode(field: impl Into<String>, message: impl ToString) -> Self {
        Error::Encode {
            field: field.into(),
            message: message.to_string(),
        }
    }

    pub fn decode(field: impl Into<String>, message: impl ToString) -> Self {
        Error::Decode {
            field: field.into(),
            message: message.to_string(),
        }
    }

    pub fn no_such_field(record: impl Into<String>, index: usize) -> Self {
        Error::NoSuchField {
            record: record.into(),
            index,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
