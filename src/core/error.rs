//! Error types for the logger system

use super::field_key::FieldKey;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Boxed error returned by a fallible serializer
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Serializer entry rejected while building a registry
    #[error("Invalid serializer for '{key}': {reason}")]
    InvalidSerializer { key: String, reason: String },

    /// A serializer failed while composing a record
    #[error(transparent)]
    SerializerExecution(#[from] SerializerExecutionError),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Formatter error with format type
    #[error("Formatter error ({format_type}): {message}")]
    FormatterError {
        format_type: String,
        message: String,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid serializer error
    pub fn invalid_serializer(key: impl Into<String>, reason: impl Into<String>) -> Self {
        LoggerError::InvalidSerializer {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a formatter error
    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            format_type: format_type.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

/// Why a serializer failed to produce a value
#[derive(Debug, thiserror::Error)]
pub enum SerializerFault {
    /// The serializer returned an error
    #[error("{0}")]
    Failed(#[source] BoxError),

    /// The serializer panicked
    #[error("serializer panicked: {0}")]
    Panicked(String),

    /// The wildcard serializer returned something other than an object
    #[error("wildcard serializer returned {found}, expected an object")]
    NotAnObject { found: &'static str },
}

/// Failure of one serializer, attributed to the key it was registered under
#[derive(Debug, thiserror::Error)]
#[error("Serializer for '{key}' failed: {cause}")]
pub struct SerializerExecutionError {
    pub key: FieldKey,
    #[source]
    pub cause: SerializerFault,
}

impl SerializerExecutionError {
    pub fn new(key: FieldKey, cause: SerializerFault) -> Self {
        Self { key, cause }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_serializer("", "field name is empty");
        assert!(matches!(err, LoggerError::InvalidSerializer { .. }));

        let err = LoggerError::formatter("JSON", "Invalid field type");
        assert!(matches!(err, LoggerError::FormatterError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_serializer("foo", "unknown standard serializer");
        assert_eq!(
            err.to_string(),
            "Invalid serializer for 'foo': unknown standard serializer"
        );

        let err = LoggerError::formatter("JSON", "Invalid field type");
        assert_eq!(
            err.to_string(),
            "Formatter error (JSON): Invalid field type"
        );
    }

    #[test]
    fn test_execution_error_attribution() {
        let err = SerializerExecutionError::new(
            FieldKey::named("user"),
            SerializerFault::Panicked("boom".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Serializer for 'user' failed: serializer panicked: boom"
        );

        let wrapped: LoggerError = err.into();
        match wrapped {
            LoggerError::SerializerExecution(inner) => {
                assert_eq!(inner.key, FieldKey::named("user"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wildcard_shape_fault() {
        let err = SerializerExecutionError::new(
            FieldKey::Wildcard,
            SerializerFault::NotAnObject { found: "a string" },
        );
        assert!(err.to_string().starts_with("Serializer for '*' failed"));
        assert!(err.to_string().contains("a string"));
    }
}
