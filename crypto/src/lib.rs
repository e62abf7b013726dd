//! Asymmetric encryption primitives for the Vigil console
//!
//! Short secrets such as a username or a password are encrypted directly
//! with an RSA public key and carried around as base64 text. The matching
//! private key is the only way back to the plaintext.
//!
//! # Example
//!
//! ```rust,no_run
//! use crypto::{decrypt_from_base64, RsaKeyPair, DEFAULT_KEY_BITS};
//!
//! # fn main() -> Result<(), crypto::CryptoError> {
//! let pair = RsaKeyPair::generate(DEFAULT_KEY_BITS)?;
//! let public_pem = pair.public_key_pem()?;
//! let private_pem = pair.private_key_pem()?;
//!
//! let ciphertext = crypto::encrypt_to_base64(&public_pem, b"secret")?;
//! let plaintext = decrypt_from_base64(&private_pem, &public_pem, &ciphertext)?;
//! assert_eq!(plaintext, b"secret");
//! # Ok(())
//! # }
//! ```

pub mod encryption;
pub mod error;
pub mod keypair;

pub use encryption::{EncryptionResult, Encryptor};
pub use error::{CryptoError, CryptoResult};
pub use keypair::{decrypt_from_base64, encrypt_to_base64, RsaKeyPair, ALGORITHM, DEFAULT_KEY_BITS};
