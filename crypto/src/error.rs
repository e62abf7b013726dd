use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Private key does not belong to the given public key")]
    KeyMismatch,

    #[error("Plaintext too long: key accepts at most {max} bytes, got {got}")]
    PlaintextTooLong { max: usize, got: usize },

    #[error("Invalid encrypted data format: {0}")]
    InvalidFormat(String),

    #[error("Invalid UTF-8 in decrypted data: {0}")]
    InvalidUtf8(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
