//! Error types for neuroscope.

use thiserror::Error;

/// The main error type for neuroscope operations.
#[derive(Error, Debug)]
pub enum NeuronError {
    /// A configuration value is outside its valid range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// The display surface (window or event loop) is unavailable.
    #[error("display unavailable: {0}")]
    Display(String),

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl NeuronError {
    /// Convenience constructor for [`NeuronError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for neuroscope operations.
pub type Result<T> = std::result::Result<T, NeuronError>;
