//! Error types and utilities shared across the annota workspace

use thiserror::Error;

/// Result type alias for annota operations
pub type Result<T> = std::result::Result<T, AnnotaError>;

/// Main error type for annota operations
#[derive(Error, Debug)]
pub enum AnnotaError {
    /// Configuration related errors (document locale settings, attributes)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Localization errors (resource resolution, fetching, formatting)
    #[error("Localization error: {message}")]
    Localization {
        message: String,
        language: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input or component data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AnnotaError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new localization error
    pub fn localization(msg: impl Into<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            language: None,
            source: None,
        }
    }

    /// Create a new localization error scoped to a language tag
    pub fn localization_with_language(
        msg: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self::Localization {
            message: msg.into(),
            language: Some(language.into()),
            source: None,
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error scoped to a field
    pub fn validation_with_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_error_display() {
        let err = AnnotaError::new("something went wrong");
        assert_eq!(err.to_string(), "something went wrong");
    }

    #[test]
    fn test_localization_error_display() {
        let err = AnnotaError::localization_with_language("missing bundle", "fr-fr");
        assert_eq!(err.to_string(), "Localization error: missing bundle");
        match err {
            AnnotaError::Localization { language, .. } => {
                assert_eq!(language.as_deref(), Some("fr-fr"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_validation_error_field() {
        let err = AnnotaError::validation_with_field("must not be empty", "text");
        match err {
            AnnotaError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("text")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AnnotaError = io.into();
        assert!(matches!(err, AnnotaError::Io(_)));
    }
}
