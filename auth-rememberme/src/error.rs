use crate::backend::AuthChainError;
use crypto::CryptoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RememberMeError {
    #[error("Failed to encrypt credentials: {0}")]
    Encryption(#[source] CryptoError),

    #[error("Failed to decrypt credentials: {0}")]
    Decryption(#[source] CryptoError),

    #[error("Key generation task failed: {0}")]
    KeyGeneration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Backend(#[from] AuthChainError),

    #[error("Invalid remember-me configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to establish session: {0}")]
    Session(String),
}

impl RememberMeError {
    /// Whether the error means the token cannot be used, as opposed to an
    /// infrastructure fault
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }
}

pub type Result<T> = std::result::Result<T, RememberMeError>;
