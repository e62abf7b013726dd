use crate::error::CryptoError;

/// Result type for encryption operations
pub type EncryptionResult<T> = Result<T, CryptoError>;

/// Trait for encryption/decryption operations
pub trait Encryptor: Send + Sync {
    /// Encrypt data
    fn encrypt(&self, plaintext: &[u8]) -> EncryptionResult<Vec<u8>>;

    /// Decrypt data
    fn decrypt(&self, ciphertext: &[u8]) -> EncryptionResult<Vec<u8>>;

    /// Get the encryption algorithm name
    fn algorithm(&self) -> &str;

    /// Decrypt data that is expected to be UTF-8 text
    fn decrypt_to_string(&self, ciphertext: &[u8]) -> EncryptionResult<String> {
        let plaintext = self.decrypt(ciphertext)?;
        String::from_utf8(plaintext).map_err(|e| CryptoError::InvalidUtf8(e.to_string()))
    }
}
