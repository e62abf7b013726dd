use crate::{
    backend::{AuthChain, BackendSelection, SessionEstablisher},
    config::RememberMeConfig,
    cookie::{CookiePayload, RememberMeCookie},
    error::{RememberMeError, Result},
    models::{Credentials, RememberMeRecord, ResumeOutcome, User},
    repository::RememberMeRepository,
};
use chrono::Utc;
use crypto::{CryptoError, RsaKeyPair};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A freshly issued token that has not been stored yet
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub payload: CookiePayload,
    pub record: RememberMeRecord,
    pub cookie: RememberMeCookie,
}

/// Issues, resumes and revokes remember-me tokens
///
/// The server keeps a private key per token and the client keeps the
/// credentials encrypted with the matching public key. Resuming decrypts the
/// credentials and sends them through the credential backends again, so a
/// changed or disabled account stops working with old tokens.
pub struct RememberMeService {
    repository: Arc<dyn RememberMeRepository>,
    auth_chain: Arc<AuthChain>,
    sessions: Arc<dyn SessionEstablisher>,
    config: RememberMeConfig,
}

impl RememberMeService {
    pub fn new(
        repository: Arc<dyn RememberMeRepository>,
        auth_chain: Arc<AuthChain>,
        sessions: Arc<dyn SessionEstablisher>,
        config: RememberMeConfig,
    ) -> Self {
        Self {
            repository,
            auth_chain,
            sessions,
            config,
        }
    }

    pub fn config(&self) -> &RememberMeConfig {
        &self.config
    }

    /// Encrypt the credentials with a new keypair
    ///
    /// Nothing is stored; see [`persist`](Self::persist) and
    /// [`remember`](Self::remember).
    pub async fn issue(&self, username: &str, password: &SecretString) -> Result<IssuedToken> {
        let bits = self.config.key_bits;
        let pair = tokio::task::spawn_blocking(move || RsaKeyPair::generate(bits))
            .await
            .map_err(|e| RememberMeError::KeyGeneration(e.to_string()))?
            .map_err(RememberMeError::Encryption)?;

        let encrypted_username = pair
            .encrypt_to_base64(username.as_bytes())
            .map_err(RememberMeError::Encryption)?;
        let encrypted_password = pair
            .encrypt_to_base64(password.expose_secret().as_bytes())
            .map_err(RememberMeError::Encryption)?;

        let public_key = pair.public_key_pem().map_err(RememberMeError::Encryption)?;
        let private_key = pair.private_key_pem().map_err(RememberMeError::Encryption)?;

        let now = Utc::now();
        let payload = CookiePayload {
            encrypted_username,
            encrypted_password,
            public_key: public_key.clone(),
        };
        let record = RememberMeRecord {
            username: username.to_string(),
            private_key: private_key.as_str().to_string(),
            public_key,
            created_at: now,
            updated_at: now,
        };
        let cookie = RememberMeCookie::issue(&self.config, &payload, now)?;

        debug!(username, "Remember-me token issued");
        Ok(IssuedToken {
            payload,
            record,
            cookie,
        })
    }

    /// Store an issued token next to any existing ones of the user
    pub async fn persist(&self, record: &RememberMeRecord) -> Result<()> {
        self.repository.insert(record).await
    }

    /// Issue a token and make it the user's only one
    ///
    /// Revoking the old tokens and storing the new one happen in a single
    /// storage operation, so a concurrent revoke cannot remove the new token
    /// between the two steps.
    pub async fn remember(&self, username: &str, password: &SecretString) -> Result<RememberMeCookie> {
        let issued = self.issue(username, password).await?;
        let replaced = self.repository.replace_for_user(&issued.record).await?;

        info!(username, replaced, "Remember-me token stored");
        Ok(issued.cookie)
    }

    /// Recover the credentials behind a cookie value
    ///
    /// A missing or malformed cookie and an unknown public key are `Ok(None)`.
    /// A stored key that cannot decrypt the cookie is
    /// [`RememberMeError::Decryption`].
    pub async fn resume(&self, cookie: Option<&str>) -> Result<Option<Credentials>> {
        let Some(value) = cookie else {
            return Ok(None);
        };
        let Some(payload) = CookiePayload::parse(value) else {
            debug!("Ignoring malformed remember-me cookie");
            return Ok(None);
        };
        let Some(record) = self.repository.find_by_public_key(&payload.public_key).await? else {
            debug!("No remember-me token stored for cookie");
            return Ok(None);
        };

        let pair = RsaKeyPair::from_pem(&record.private_key, &payload.public_key).map_err(decryption)?;
        let username = decrypt_text(&pair, &payload.encrypted_username)?;
        let password = decrypt_text(&pair, &payload.encrypted_password)?;

        Ok(Some(Credentials {
            username,
            password: SecretString::new(password),
        }))
    }

    /// Check resumed credentials against the non-external backends and log
    /// the user in on success
    ///
    /// Wrong credentials are `Ok(false)`; errors are infrastructure faults.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<bool> {
        Ok(self.authenticate_user(credentials).await?.is_some())
    }

    /// Resume and authenticate in one step
    ///
    /// A token that cannot be decrypted is treated like no token at all.
    /// Storage and backend failures are still returned.
    pub async fn restore_session(&self, cookie: Option<&str>) -> Result<ResumeOutcome> {
        let credentials = match self.resume(cookie).await {
            Ok(Some(credentials)) => credentials,
            Ok(None) => return Ok(ResumeOutcome::NotAuthenticated),
            Err(e) if e.is_decryption() => {
                warn!(error = %e, "Discarding remember-me token that cannot be decrypted");
                return Ok(ResumeOutcome::NotAuthenticated);
            }
            Err(e) => return Err(e),
        };

        Ok(match self.authenticate_user(&credentials).await? {
            Some(user) => ResumeOutcome::Authenticated(user),
            None => ResumeOutcome::NotAuthenticated,
        })
    }

    /// Delete every token of `username`, on every device
    pub async fn revoke(&self, username: &str) -> Result<u64> {
        let removed = self.repository.delete_by_username(username).await?;
        info!(username, removed, "Remember-me tokens revoked");
        Ok(removed)
    }

    /// Revoke the user's tokens and return a cookie that clears the client's
    pub async fn forget(&self, username: &str) -> Result<RememberMeCookie> {
        self.revoke(username).await?;
        Ok(RememberMeCookie::forget(&self.config))
    }

    /// Delete tokens whose cookie has expired
    pub async fn purge_expired(&self) -> Result<u64> {
        let cutoff = self.config.purge_cutoff(Utc::now())?;
        let removed = self.repository.delete_created_before(cutoff).await?;
        info!(removed, %cutoff, "Expired remember-me tokens purged");
        Ok(removed)
    }

    async fn authenticate_user(&self, credentials: &Credentials) -> Result<Option<User>> {
        let mut user = User::new(&credentials.username);
        if !user.has_domain() {
            if let Some(domain) = self.config.default_domain() {
                user.set_domain(domain);
            }
        }

        let authenticated = self
            .auth_chain
            .authenticate(&user, &credentials.password, BackendSelection::SkipExternal)
            .await?;
        if !authenticated {
            info!(user = %user, "Remember-me credentials rejected");
            return Ok(None);
        }

        self.sessions.establish(&user).await?;
        Ok(Some(user))
    }
}

fn decryption(error: CryptoError) -> RememberMeError {
    RememberMeError::Decryption(error)
}

fn decrypt_text(pair: &RsaKeyPair, ciphertext: &str) -> Result<String> {
    let plaintext = pair.decrypt_from_base64(ciphertext).map_err(decryption)?;
    String::from_utf8(plaintext).map_err(|e| decryption(CryptoError::InvalidUtf8(e.to_string())))
}
