use thiserror::Error;

/// Errors produced by type parsing and validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier {value:?}: {reason}")]
    InvalidIdentifier { value: String, reason: String },

    #[error("unknown document kind: {0}")]
    UnknownKind(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
