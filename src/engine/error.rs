//! Engine error types

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The caller passed a value the registry cannot interpret (e.g. a URL
    /// without the `jdbc` prefix). Not retryable.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl EngineError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
