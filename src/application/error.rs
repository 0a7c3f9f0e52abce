//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// True when the input document itself was rejected.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ApplicationError::Domain(
                DomainError::Parse(_)
                    | DomainError::DuplicateId(_)
                    | DomainError::InvalidNode { .. }
                    | DomainError::DepthLimitExceeded { .. }
                    | DomainError::EmptyTree
            )
        )
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
