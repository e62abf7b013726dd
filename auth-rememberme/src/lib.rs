//! Persistent "remember me" logins for the Vigil console
//!
//! When a user asks to be remembered, a fresh RSA keypair is generated. The
//! username and password are encrypted with the public key and handed to the
//! client as the `remember-me` cookie, while the private key is stored on the
//! server. A returning client without a session presents the cookie, the
//! server looks up the private key by the public key embedded in it, decrypts
//! the credentials and runs them through the credential backends again.
//!
//! # Example
//!
//! ```rust,no_run
//! use auth_rememberme::{
//!     AuthChain, InMemoryRememberMeRepository, RememberMeConfig, RememberMeService,
//!     ResumeOutcome, SessionEstablisher, User,
//! };
//! use async_trait::async_trait;
//! use secrecy::SecretString;
//! use std::sync::Arc;
//!
//! struct Sessions;
//!
//! #[async_trait]
//! impl SessionEstablisher for Sessions {
//!     async fn establish(&self, _user: &User) -> auth_rememberme::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn run(chain: AuthChain) -> auth_rememberme::Result<()> {
//! let service = RememberMeService::new(
//!     Arc::new(InMemoryRememberMeRepository::new()),
//!     Arc::new(chain),
//!     Arc::new(Sessions),
//!     RememberMeConfig::default(),
//! );
//!
//! let password = SecretString::new("secret".to_string());
//! let cookie = service.remember("alice", &password).await?;
//! // Send `cookie.header_value()` as Set-Cookie
//!
//! let outcome = service.restore_session(Some(cookie.value())).await?;
//! assert!(matches!(outcome, ResumeOutcome::Authenticated(_)));
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod cookie;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use backend::{AuthChain, AuthChainError, BackendError, BackendSelection, CredentialBackend, SessionEstablisher};
pub use config::RememberMeConfig;
pub use cookie::{CookiePayload, RememberMeCookie, COOKIE_NAME};
pub use error::{RememberMeError, Result};
pub use models::{Credentials, RememberMeRecord, ResumeOutcome, User};
pub use repository::{InMemoryRememberMeRepository, PostgresRememberMeRepository, RememberMeRepository};
pub use service::{IssuedToken, RememberMeService};
