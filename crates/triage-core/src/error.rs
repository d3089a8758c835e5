use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {artifact}: {reason}")]
    InvalidArtifact {
        artifact: &'static str,
        reason: String,
    },

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("{what} mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("inference failed: {0}")]
    Inference(String),
}

impl Error {
    pub fn invalid(artifact: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            artifact,
            reason: reason.into(),
        }
    }

    /// True for failures that must abort startup before any request is served.
    pub fn is_startup(&self) -> bool {
        !matches!(self, Self::Inference(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_inference_is_a_runtime_error() {
        assert!(Error::ArtifactNotFound("words.json".into()).is_startup());
        assert!(Error::ModelUnavailable("missing".into()).is_startup());
        assert!(
            Error::ShapeMismatch {
                what: "model input",
                expected: 3,
                actual: 4
            }
            .is_startup()
        );
        assert!(!Error::Inference("bad tensor".into()).is_startup());
    }

    #[test]
    fn shape_mismatch_message() {
        let err = Error::ShapeMismatch {
            what: "model output",
            expected: 2,
            actual: 5,
        };
        assert_eq!(err.to_string(), "model output mismatch: expected 2, got 5");
    }
}
