//! Error types for the Telegram sender

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidEnv {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to open session file: {0}")]
    SessionOpen(String),

    #[error("Session is locked by another process")]
    SessionLocked,

    #[error("Failed to acquire session lock: {0}")]
    LockError(String),

    #[error("Sign-in failed: {0}")]
    SignIn(String),

    #[error("Username @{0} not found")]
    RecipientNotFound(String),

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<grammers_client::InvocationError> for Error {
    fn from(err: grammers_client::InvocationError) -> Self {
        Error::Telegram(err.to_string())
    }
}

impl Error {
    /// Whether the error was raised while resolving configuration, before any
    /// network activity.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::MissingEnv(_) | Error::InvalidEnv { .. })
    }
}
