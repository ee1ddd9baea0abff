use thiserror::Error;

use crate::llm::LlmError;

/// Errors related to persisted document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid element id: {0}")]
    InvalidId(String),

    #[error("no element with id '{0}' in document")]
    TargetNotFound(String),

    #[error("element id '{id}' matches {count} elements")]
    AmbiguousTarget { id: String, count: usize },

    #[error("rewrite error: {0}")]
    Rewrite(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        DocumentError::Storage(e.to_string())
    }
}

/// Caller-visible errors of a generation request.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("no element with id '{0}' in document")]
    TargetNotFound(String),

    #[error("element id '{id}' matches {count} elements")]
    AmbiguousTarget { id: String, count: usize },

    #[error("model provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("document storage error: {0}")]
    Storage(String),
}

impl From<DocumentError> for GenerationError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::InvalidId(msg) => GenerationError::InvalidArgument(msg),
            DocumentError::TargetNotFound(id) => GenerationError::TargetNotFound(id),
            DocumentError::AmbiguousTarget { id, count } => {
                GenerationError::AmbiguousTarget { id, count }
            }
            DocumentError::Rewrite(msg) | DocumentError::Storage(msg) => {
                GenerationError::Storage(msg)
            }
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Deserialization(msg) => GenerationError::MalformedResponse(msg),
            LlmError::EmptyResponse => GenerationError::MalformedResponse(e.to_string()),
            other => GenerationError::UpstreamUnavailable(other.to_string()),
        }
    }
}
