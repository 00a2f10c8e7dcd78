//! Error types for schema analysis

use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Error type for schema operations
///
/// These only ever fail a single schema file. Decoding problems in option
/// metadata, unresolved entity identifiers and unclassifiable methods are not
/// errors at all.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A declaration is structurally unusable
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// Two declarations in one file share a name
    #[error("duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// An enum or message field does not say which type it references
    #[error("field {message}.{field} references a type but has no type_name")]
    MissingTypeName { message: String, field: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An emitter could not produce its output
    #[error("emitter {emitter} failed: {message}")]
    EmitterError { emitter: String, message: String },
}

impl SchemaError {
    /// Returns a stable numeric code, used as the CLI exit status
    pub fn error_code(&self) -> u32 {
        match self {
            SchemaError::InvalidDeclaration(_) => 1,
            SchemaError::DuplicateDeclaration(_) => 2,
            SchemaError::MissingTypeName { .. } => 3,
            SchemaError::ConfigError(_) => 4,
            SchemaError::SerializationError(_) => 5,
            SchemaError::EmitterError { .. } => 6,
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::SerializationError(err.to_string())
    }
}
