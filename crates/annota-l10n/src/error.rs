//! Error types for localization operations

use thiserror::Error;

/// Errors that can occur during localization operations
#[derive(Error, Debug)]
pub enum LocalizeError {
    /// Failed to parse a language identifier
    #[error("Invalid language tag: {0}")]
    InvalidLanguageTag(String),

    /// Failed to load a resource bundle
    #[error("Failed to load resource bundle: {path}")]
    BundleLoad { path: String },

    /// Failed to parse a resource bundle
    #[error("Failed to parse resource bundle: {message}")]
    BundleParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A resource fetch issued by the controller failed
    #[error("Resource fetch failed: {message}")]
    ResourceFetch { message: String },

    /// A message template failed to compile
    #[error("Malformed message template: {message}")]
    MalformedTemplate { message: String },

    /// Failed to parse a localized value back into a typed one
    #[error("Failed to parse {kind} from '{input}' for language {language}")]
    ValueParse {
        kind: &'static str,
        input: String,
        language: String,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for localization operations
pub type LocalizeResult<T> = std::result::Result<T, LocalizeError>;

impl From<LocalizeError> for annota_common::AnnotaError {
    fn from(err: LocalizeError) -> Self {
        annota_common::AnnotaError::Localization {
            message: err.to_string(),
            language: None,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_into_workspace_error() {
        let err = LocalizeError::ResourceFetch {
            message: "backend unavailable".to_string(),
        };
        let converted: annota_common::AnnotaError = err.into();
        match converted {
            annota_common::AnnotaError::Localization { message, source, .. } => {
                assert!(message.contains("backend unavailable"));
                assert!(source.is_some());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_value_parse_display() {
        let err = LocalizeError::ValueParse {
            kind: "number",
            input: "abc".to_string(),
            language: "fr".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse number from 'abc' for language fr"
        );
    }
}
