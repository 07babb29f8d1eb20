// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use crate::pipeline::RunPhase;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Run failed while {phase}: {source}")]
    RunFailed {
        phase: RunPhase,
        source: Box<PipelineError>,
    },
}

/// Failure of a single classification call.
///
/// Never aborts a run: the batch driver maps every variant to the
/// `Uncategorized` label and moves on to the next record.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Request to classifier failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Classifier rejected credentials (HTTP {status}): {body}")]
    Authentication { status: u16, body: String },

    #[error("Classifier returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),

    #[error("Classifier returned an empty label")]
    EmptyResponse,
}

impl ClassifierError {
    /// Build the error for a non-success HTTP status.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Authentication { status, body },
            _ => Self::Http { status, body },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ClassifierError::from_status(401, "bad key".into()),
            ClassifierError::Authentication { status: 401, .. }
        ));
        assert!(matches!(
            ClassifierError::from_status(429, "slow down".into()),
            ClassifierError::Http { status: 429, .. }
        ));
    }

    #[test]
    fn test_run_failed_message_names_phase() {
        let err = PipelineError::RunFailed {
            phase: RunPhase::Loading,
            source: Box::new(PipelineError::Schema("missing url column".into())),
        };
        let message = err.to_string();
        assert!(message.contains("loading"));
        assert!(message.contains("missing url column"));
    }
}
