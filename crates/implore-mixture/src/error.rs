//! Error types for implore-mixture
//!
//! Provides error handling for:
//! - Model input validation
//! - Variable selection
//! - Rendering and export
//! - Configuration loading

use std::path::PathBuf;
use thiserror::Error;

use implore_io::IoError;

/// Main error type for mixture density plotting
#[derive(Error, Debug)]
pub enum MixtureError {
    /// No variable is left to plot
    #[error("No variables to plot (requested: {requested:?}, available: {available:?})")]
    NoVariables {
        requested: Vec<String>,
        available: Vec<String>,
    },

    /// A model's tables are malformed
    #[error("Invalid model '{model}': {message}")]
    InvalidModel { model: String, message: String },

    /// The plotting backend failed
    #[error("Rendering failed: {message}")]
    Render { message: String },

    /// Invalid configuration
    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Table loading errors
    #[error("Failed to load table: {0}")]
    Table(#[from] IoError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MixtureError {
    pub(crate) fn invalid_model(model: &str, message: impl Into<String>) -> Self {
        Self::InvalidModel {
            model: model.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn render(err: impl std::fmt::Display) -> Self {
        Self::Render {
            message: err.to_string(),
        }
    }
}

/// Result type alias for mixture operations
pub type MixtureResult<T> = Result<T, MixtureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_variables_display() {
        let err = MixtureError::NoVariables {
            requested: vec!["nonexistent".to_string()],
            available: vec!["x1".to_string(), "x2".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("nonexistent"));
        assert!(message.contains("x2"));
    }

    #[test]
    fn test_invalid_model_display() {
        let err = MixtureError::invalid_model("lca_3", "posterior has 4 rows, observed has 5");
        assert!(err.to_string().contains("lca_3"));
        assert!(err.to_string().contains("4 rows"));
    }

    #[test]
    fn test_table_error_converts() {
        let err: MixtureError = IoError::ColumnNotFound("x".to_string()).into();
        assert!(matches!(err, MixtureError::Table(_)));
    }
}
