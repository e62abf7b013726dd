//! The `remember-me` cookie and its payload.
//!
//! The value is three base64 segments joined by `|`: the encrypted username,
//! the encrypted password and the PEM public key. Base64 never produces `|`,
//! so the separator is unambiguous.

use crate::{config::RememberMeConfig, error::Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use std::fmt;

pub const COOKIE_NAME: &str = "remember-me";

const SEPARATOR: char = '|';

/// The decoded value of a remember-me cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePayload {
    /// Base64 ciphertext of the username
    pub encrypted_username: String,
    /// Base64 ciphertext of the password
    pub encrypted_password: String,
    /// PEM text of the public key, stored decoded
    pub public_key: String,
}

impl CookiePayload {
    pub fn encode(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.encrypted_username,
            self.encrypted_password,
            BASE64.encode(&self.public_key),
            sep = SEPARATOR
        )
    }

    /// Parse a cookie value. Anything that is not exactly three non-empty
    /// segments with a decodable public key yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let mut segments = value.trim().split(SEPARATOR);
        let encrypted_username = segments.next().filter(|s| !s.is_empty())?;
        let encrypted_password = segments.next().filter(|s| !s.is_empty())?;
        let public_key = segments.next().filter(|s| !s.is_empty())?;
        if segments.next().is_some() {
            return None;
        }

        let public_key = BASE64.decode(public_key).ok()?;
        let public_key = String::from_utf8(public_key).ok()?;

        Some(Self {
            encrypted_username: encrypted_username.to_string(),
            encrypted_password: encrypted_password.to_string(),
            public_key,
        })
    }
}

/// A cookie ready to be sent as a `Set-Cookie` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RememberMeCookie {
    name: String,
    value: String,
    expires: DateTime<Utc>,
    path: String,
    http_only: bool,
    secure: bool,
}

impl RememberMeCookie {
    /// Cookie carrying `payload`, valid for the configured lifetime
    pub fn issue(config: &RememberMeConfig, payload: &CookiePayload, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            name: config.cookie_name.clone(),
            value: payload.encode(),
            expires: config.expires_at(now)?,
            path: "/".to_string(),
            http_only: true,
            secure: config.secure_cookie,
        })
    }

    /// Cookie telling the client to drop its remember-me cookie
    pub fn forget(config: &RememberMeConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            value: String::new(),
            expires: DateTime::<Utc>::default(),
            path: "/".to_string(),
            http_only: true,
            secure: config.secure_cookie,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires(&self) -> DateTime<Utc> {
        self.expires
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Value of the `Set-Cookie` header
    pub fn header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RememberMeCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Expires={}; Path={}",
            self.name,
            self.value,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.path
        )?;
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload() -> CookiePayload {
        CookiePayload {
            encrypted_username: "dXNlcg==".to_string(),
            encrypted_password: "cGFzcw==".to_string(),
            public_key: "-----BEGIN RSA PUBLIC KEY-----\nMIIB\n-----END RSA PUBLIC KEY-----\n".to_string(),
        }
    }

    #[test]
    fn test_encode_and_parse() {
        let encoded = payload().encode();
        assert_eq!(encoded.matches('|').count(), 2);
        assert!(encoded.starts_with("dXNlcg==|cGFzcw==|"));
        assert_eq!(CookiePayload::parse(&encoded), Some(payload()));
    }

    #[test]
    fn test_malformed_values_are_ignored() {
        let public_key = BASE64.encode("key");
        for value in [
            String::new(),
            "only-one-segment".to_string(),
            "a|b".to_string(),
            format!("a|b|{}|d", public_key),
            format!("|b|{}", public_key),
            "a|b|%%%not-base64%%%".to_string(),
        ] {
            assert_eq!(CookiePayload::parse(&value), None, "{:?}", value);
        }
    }

    #[test]
    fn test_set_cookie_header() {
        let config = RememberMeConfig::default();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let cookie = RememberMeCookie::issue(&config, &payload(), now).unwrap();

        assert_eq!(cookie.expires(), Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap());
        assert_eq!(
            cookie.header_value(),
            format!(
                "remember-me={}; Expires=Sat, 31 Jan 2026 12:00:00 GMT; Path=/; HttpOnly",
                payload().encode()
            )
        );
    }

    #[test]
    fn test_forget_cookie() {
        let config = RememberMeConfig {
            secure_cookie: true,
            ..RememberMeConfig::default()
        };
        let cookie = RememberMeCookie::forget(&config);

        assert_eq!(cookie.value(), "");
        assert!(cookie.is_secure());
        assert_eq!(
            cookie.header_value(),
            "remember-me=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/; HttpOnly; Secure"
        );
    }
}
