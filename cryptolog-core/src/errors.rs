//! Error types for Cryptolog

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptologError>;

#[derive(Error, Debug)]
pub enum CryptologError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Entropy source failure: {0}")]
    EntropySource(String),

    #[error("Invalid salt lifetime: {0}")]
    InvalidSaltLifetime(String),

    #[error("Salt rotation task failed: {0}")]
    RotationTask(String),
}

impl From<tokio::task::JoinError> for CryptologError {
    fn from(err: tokio::task::JoinError) -> Self {
        CryptologError::RotationTask(err.to_string())
    }
}
