//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{failed} of {total} mind maps could not be rendered")]
    PartialFailure { failed: usize, total: usize },
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Serialize(_) => crate::exitcode::SOFTWARE,
            CliError::PartialFailure { .. } => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => {
                    crate::exitcode::NOPERM
                }
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => application_exit_code(app),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    if e.is_invalid_input() {
        return crate::exitcode::DATAERR;
    }
    match e {
        ApplicationError::Config { .. } => crate::exitcode::CONFIG,
        ApplicationError::Domain(DomainError::InvalidViewState(_)) => crate::exitcode::USAGE,
        ApplicationError::Domain(_) => crate::exitcode::SOFTWARE,
        ApplicationError::OperationFailed { source, .. } => {
            match source.downcast_ref::<std::io::Error>().map(|io| io.kind()) {
                Some(std::io::ErrorKind::NotFound) => crate::exitcode::NOINPUT,
                Some(std::io::ErrorKind::PermissionDenied) => crate::exitcode::NOPERM,
                _ => crate::exitcode::IOERR,
            }
        }
    }
}
