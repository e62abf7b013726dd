use crate::error::{RememberMeError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted cookie lifetime, ten years
pub const MAX_LIFETIME_DAYS: u32 = 3650;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RememberMeConfig {
    pub cookie_name: String,
    pub lifetime_days: u32,
    /// RSA modulus size of freshly issued keypairs
    pub key_bits: usize,
    /// Only send the cookie over TLS
    pub secure_cookie: bool,
    /// Domain assigned to users without one when a token is resumed
    pub default_domain: Option<String>,
}

impl Default for RememberMeConfig {
    fn default() -> Self {
        Self {
            cookie_name: crate::cookie::COOKIE_NAME.to_string(),
            lifetime_days: 30,
            key_bits: crypto::DEFAULT_KEY_BITS,
            secure_cookie: false,
            default_domain: None,
        }
    }
}

impl RememberMeConfig {
    /// Reject settings the token lifecycle cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.lifetime_days == 0 || self.lifetime_days > MAX_LIFETIME_DAYS {
            return Err(RememberMeError::InvalidConfig(format!(
                "lifetime_days must be between 1 and {}, got {}",
                MAX_LIFETIME_DAYS, self.lifetime_days
            )));
        }
        if self.cookie_name.trim().is_empty() {
            return Err(RememberMeError::InvalidConfig(
                "cookie_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn lifetime(&self) -> Duration {
        Duration::days(i64::from(self.lifetime_days))
    }

    /// When a cookie issued at `issued_at` expires
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Result<DateTime<Utc>> {
        issued_at
            .checked_add_signed(self.lifetime())
            .ok_or_else(|| self.out_of_range())
    }

    /// Records created before this instant belong to expired cookies
    pub fn purge_cutoff(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        now.checked_sub_signed(self.lifetime())
            .ok_or_else(|| self.out_of_range())
    }

    fn out_of_range(&self) -> RememberMeError {
        RememberMeError::InvalidConfig(format!(
            "lifetime of {} days is out of range",
            self.lifetime_days
        ))
    }

    pub(crate) fn default_domain(&self) -> Option<&str> {
        self.default_domain
            .as_deref()
            .map(str::trim)
            .filter(|domain| !domain.is_empty())
    }
}
