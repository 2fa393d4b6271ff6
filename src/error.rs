//! Error types for the classifier gate.

/// Errors from loading or scoring with an action classifier.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid model: {0}")]
    Invalid(String),
}
