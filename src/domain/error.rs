//! Domain-level errors (no I/O concerns)

use thiserror::Error;

/// Rejection of a serialized mind-map document.
///
/// Carries the position reported by the parser so callers can point
/// authors at the offending spot; the message already names it.
/// `line`/`column` are 1-based, 0 when the failure is not tied to a
/// position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        Self {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        }
    }
}

/// Domain errors represent violations of the tree and layout rules.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid mind map document: {0}")]
    Parse(#[from] ParseError),

    #[error("mind map has no root node")]
    EmptyTree,

    #[error("node not found in arena: {0}")]
    NodeNotFound(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("invalid node {path}: {reason}")]
    InvalidNode { path: String, reason: String },

    #[error("node {id} exceeds maximum depth {limit}")]
    DepthLimitExceeded { id: String, limit: usize },

    #[error("invalid view state: {0}")]
    InvalidViewState(String),

    #[error("invalid layout config: {0}")]
    InvalidLayoutConfig(String),

    #[error("internal tree operation failed: {0}")]
    Internal(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
