use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored remember-me token, keyed by its public key
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RememberMeRecord {
    pub username: String,
    /// PKCS#1 PEM
    pub private_key: String,
    /// PKCS#1 PEM, unique across all records
    pub public_key: String,
    #[sqlx(rename = "ctime")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "mtime")]
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for RememberMeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RememberMeRecord")
            .field("username", &self.username)
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Username and password recovered from a token
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }
}

/// A user name, optionally qualified by a domain
///
/// Both `jdoe@example.com` and `EXAMPLE\jdoe` are understood. The local part
/// and the domain are kept apart so a default domain can be applied later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    local_name: String,
    domain: Option<String>,
}

impl User {
    pub fn new(username: &str) -> Self {
        if let Some((domain, local_name)) = username.split_once('\\') {
            return Self::with_domain(local_name, domain);
        }
        if let Some((local_name, domain)) = username.split_once('@') {
            return Self::with_domain(local_name, domain);
        }
        Self {
            local_name: username.to_string(),
            domain: None,
        }
    }

    fn with_domain(local_name: &str, domain: &str) -> Self {
        Self {
            local_name: local_name.to_string(),
            domain: Some(domain.to_string()).filter(|domain| !domain.is_empty()),
        }
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn has_domain(&self) -> bool {
        self.domain.is_some()
    }

    pub fn set_domain(&mut self, domain: impl Into<String>) {
        let domain = domain.into();
        self.domain = if domain.is_empty() { None } else { Some(domain) };
    }

    /// `local@domain`, or just the local name
    pub fn username(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.domain {
            Some(domain) => write!(f, "{}@{}", self.local_name, domain),
            None => f.write_str(&self.local_name),
        }
    }
}

/// Result of trying to restore a session from a cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeOutcome {
    Authenticated(User),
    NotAuthenticated,
}

impl ResumeOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
