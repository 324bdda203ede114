use reviewdesk_core::{DbError, ErrorKind, LoggingError, ServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

#[derive(Debug)]
pub enum CliError {
    Service(ServiceError),
    Db(DbError),
    Logging(LoggingError),
    Io(std::io::Error),
    Output(serde_json::Error),
}

impl CliError {
    /// Stable code printed alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Service(err) => err.code(),
            Self::Db(_) => "store_open_failed",
            Self::Logging(_) => "logging_init_failed",
            Self::Io(_) => "io_failed",
            Self::Output(_) => "output_failed",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Service(err) => err.kind(),
            _ => ErrorKind::Internal,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.kind() {
            ErrorKind::Internal => ExitCode::from(1),
            ErrorKind::Validation => ExitCode::from(2),
            ErrorKind::NotFound => ExitCode::from(3),
            ErrorKind::Conflict => ExitCode::from(4),
            ErrorKind::InsufficientResources => ExitCode::from(5),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "failed to open database: {err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to encode output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}
