// ================================================================
// File: vouchervote-common/src/error.rs
// ================================================================

use thiserror::Error;

/// Coarse classification used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    InvalidInput,
    Internal,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Voucher {0} not found")]
    VoucherNotFound(i64),

    #[error("Project {0} not found")]
    ProjectNotFound(i32),

    #[error("Voucher {0} has already been used")]
    VoucherUsed(i64),

    #[error("Voucher {0} has expired")]
    VoucherExpired(i64),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::VoucherNotFound(_) | Error::ProjectNotFound(_) => ErrorKind::NotFound,
            Error::VoucherUsed(_) | Error::VoucherExpired(_) => ErrorKind::InvalidState,
            Error::Parse(_) => ErrorKind::InvalidInput,
            Error::Config(_)
            | Error::Database(_)
            | Error::Migration(_)
            | Error::Io(_)
            | Error::AddrParse(_) => ErrorKind::Internal,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

impl From<chrono::format::ParseError> for Error {
    fn from(err: chrono::format::ParseError) -> Self {
        Error::Parse(err.to_string())
    }
}
