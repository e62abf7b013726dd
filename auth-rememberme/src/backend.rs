//! Seams to the credential backends and the session layer.
//!
//! Validating a password and keeping a session are not done here; the token
//! service hands decrypted credentials to an [`AuthChain`] and reports a
//! successful login to a [`SessionEstablisher`].

use crate::{error::Result, models::User};
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Infrastructure failure inside a single backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthChainError {
    #[error("All {attempted} authentication backends failed: {}", .failures.join("; "))]
    AllBackendsFailed {
        attempted: usize,
        failures: Vec<String>,
    },
}

/// A source of truth for username/password pairs (LDAP, database, ...)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialBackend: Send + Sync {
    fn name(&self) -> &str;

    /// External backends rely on an interactive login flow (e.g. an
    /// authenticating reverse proxy) and cannot check a stored password
    fn is_external(&self) -> bool {
        false
    }

    /// `Ok(false)` for wrong credentials, `Err` only when the backend itself
    /// is unavailable
    async fn authenticate(&self, user: &User, password: &SecretString) -> std::result::Result<bool, BackendError>;
}

/// Which backends an [`AuthChain`] consults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendSelection {
    #[default]
    All,
    /// Leave out external backends, used when resuming from a token
    SkipExternal,
}

/// Ordered list of credential backends; the first one accepting the
/// credentials wins
#[derive(Clone, Default)]
pub struct AuthChain {
    backends: Vec<Arc<dyn CredentialBackend>>,
}

impl AuthChain {
    pub fn new(backends: Vec<Arc<dyn CredentialBackend>>) -> Self {
        Self { backends }
    }

    pub fn push(&mut self, backend: Arc<dyn CredentialBackend>) -> &mut Self {
        self.backends.push(backend);
        self
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Try each selected backend in order
    ///
    /// A backend that fails is logged and skipped. Only when every attempted
    /// backend failed is the failure returned, so an outage of one backend
    /// does not lock out users of the others.
    pub async fn authenticate(
        &self,
        user: &User,
        password: &SecretString,
        selection: BackendSelection,
    ) -> std::result::Result<bool, AuthChainError> {
        let mut attempted = 0usize;
        let mut failures = Vec::new();

        for backend in &self.backends {
            if selection == BackendSelection::SkipExternal && backend.is_external() {
                debug!(backend = backend.name(), "Skipping external backend");
                continue;
            }

            attempted += 1;
            match backend.authenticate(user, password).await {
                Ok(true) => {
                    info!(backend = backend.name(), user = %user, "User authenticated");
                    return Ok(true);
                }
                Ok(false) => {
                    debug!(backend = backend.name(), user = %user, "Credentials rejected");
                }
                Err(e) => {
                    error!(backend = backend.name(), user = %user, error = %e, "Authentication backend failed");
                    failures.push(format!("{}: {}", backend.name(), e));
                }
            }
        }

        if attempted > 0 && failures.len() == attempted {
            return Err(AuthChainError::AllBackendsFailed { attempted, failures });
        }
        Ok(false)
    }
}

/// Marks a user as logged in for the current client
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionEstablisher: Send + Sync {
    async fn establish(&self, user: &User) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(name: &str, external: bool, outcome: std::result::Result<bool, BackendError>) -> Arc<dyn CredentialBackend> {
        let mut backend = MockCredentialBackend::new();
        backend.expect_name().return_const(name.to_string());
        backend.expect_is_external().return_const(external);
        backend
            .expect_authenticate()
            .returning(move |_, _| outcome.clone());
        Arc::new(backend)
    }

    fn unused(name: &str, external: bool) -> Arc<dyn CredentialBackend> {
        let mut backend = MockCredentialBackend::new();
        backend.expect_name().return_const(name.to_string());
        backend.expect_is_external().return_const(external);
        backend.expect_authenticate().never();
        Arc::new(backend)
    }

    fn password() -> SecretString {
        SecretString::new("secret".to_string())
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let chain = AuthChain::new(vec![
            backend("ldap", false, Ok(false)),
            backend("db", false, Ok(true)),
            unused("fallback", false),
        ]);

        let authenticated = chain
            .authenticate(&User::new("alice"), &password(), BackendSelection::All)
            .await
            .unwrap();
        assert!(authenticated);
    }

    #[tokio::test]
    async fn test_external_backends_are_skipped() {
        let chain = AuthChain::new(vec![unused("proxy", true), backend("db", false, Ok(false))]);

        let authenticated = chain
            .authenticate(&User::new("alice"), &password(), BackendSelection::SkipExternal)
            .await
            .unwrap();
        assert!(!authenticated);
    }

    #[tokio::test]
    async fn test_failing_backend_is_skipped() {
        let chain = AuthChain::new(vec![
            backend("ldap", false, Err(BackendError("connection refused".to_string()))),
            backend("db", false, Ok(true)),
        ]);

        let authenticated = chain
            .authenticate(&User::new("alice"), &password(), BackendSelection::All)
            .await
            .unwrap();
        assert!(authenticated);
    }

    #[tokio::test]
    async fn test_rejection_and_failure_is_a_rejection() {
        let chain = AuthChain::new(vec![
            backend("ldap", false, Err(BackendError("timeout".to_string()))),
            backend("db", false, Ok(false)),
        ]);

        let authenticated = chain
            .authenticate(&User::new("alice"), &password(), BackendSelection::All)
            .await
            .unwrap();
        assert!(!authenticated);
    }

    #[tokio::test]
    async fn test_all_backends_failing_is_an_error() {
        let chain = AuthChain::new(vec![
            backend("ldap", false, Err(BackendError("timeout".to_string()))),
            backend("db", false, Err(BackendError("pool exhausted".to_string()))),
        ]);

        let error = chain
            .authenticate(&User::new("alice"), &password(), BackendSelection::All)
            .await
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "All 2 authentication backends failed: ldap: timeout; db: pool exhausted"
        );
    }

    #[tokio::test]
    async fn test_empty_chain_rejects() {
        let chain = AuthChain::default();
        assert!(chain.is_empty());
        assert!(!chain
            .authenticate(&User::new("alice"), &password(), BackendSelection::All)
            .await
            .unwrap());
    }
}
