//! Domain-specific error types for prompt-forge

use thiserror::Error;

/// Main error type for the prompt-forge engine and its collaborators
#[derive(Error, Debug)]
pub enum PromptForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Knowledge base error: {message}")]
    KnowledgeBase { message: String },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("Pipeline fault in {stage}: {message}")]
    Pipeline { stage: String, message: String },

    #[error("An optimization is already in progress for this session")]
    OptimizationInProgress,

    #[error("Library error: {message}")]
    Library { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl PromptForgeError {
    pub(crate) fn pipeline(stage: &str, message: impl Into<String>) -> Self {
        PromptForgeError::Pipeline {
            stage: stage.to_string(),
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for PromptForgeError {
    fn from(err: anyhow::Error) -> Self {
        PromptForgeError::Config {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PromptForgeError {
    fn from(err: serde_json::Error) -> Self {
        PromptForgeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PromptForgeError {
    fn from(err: toml::de::Error) -> Self {
        PromptForgeError::Config {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for PromptForgeError {
    fn from(err: std::io::Error) -> Self {
        PromptForgeError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type alias for prompt-forge operations
pub type Result<T> = std::result::Result<T, PromptForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_names_stage() {
        let err = PromptForgeError::pipeline("Framework Formatting", "empty output");
        assert_eq!(
            err.to_string(),
            "Pipeline fault in Framework Formatting: empty output"
        );
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let err: PromptForgeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, PromptForgeError::Serialization { .. }));
    }
}
