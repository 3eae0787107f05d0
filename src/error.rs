//! Error types for classifier loading, inference and configuration.
//!
//! Feature extraction has no error type: malformed URLs degrade to
//! zero/empty feature values instead of failing.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("model artifact unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    #[error("feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("classifier inference failed: {0}")]
    InferenceFailure(String),

    #[error("classifier inference timed out after {0:?}")]
    InferenceTimeout(Duration),
}

impl From<ClassifierError> for DecisionError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::Inference(msg) => DecisionError::InferenceFailure(msg),
            other => DecisionError::InferenceFailure(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type DecisionResult<T> = Result<T, DecisionError>;
