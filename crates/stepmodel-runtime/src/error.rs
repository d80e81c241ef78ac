use std::path::PathBuf;

use thiserror::Error;

use crate::step_model::Field;

pub type Result<T> = std::result::Result<T, StepModelError>;

/// Failure reported by a fallible beautification policy.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct BeautifyError {
    pub message: String,
}

impl BeautifyError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StepModelError {
    /// The beautification policy rejected a derived value. Nothing was
    /// committed.
    #[error("beautifier rejected {field} value {value}: {source}")]
    Beautify {
        field: Field,
        value: f64,
        source: BeautifyError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[cfg(feature = "config")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid slider config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
