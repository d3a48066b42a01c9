//! OAuth token acquisition.
//!
//! Tokens are obtained with the client-credentials grant and treated as
//! expired 15 minutes before the lifetime the server announces.

use crate::error::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

/// Path of the token endpoint, relative to the tenant base URL.
pub const TOKEN_PATH: &str = "/oauth/token";

/// Safety margin subtracted from the announced token lifetime.
const EXPIRY_MARGIN_MINUTES: i64 = 15;

/// Client credentials for a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// A bearer token with its expiration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    /// Create a token issued at `issued_at` and valid for `expires_in` seconds.
    #[must_use]
    pub fn new(value: impl Into<String>, expires_in: i64, issued_at: DateTime<Utc>) -> Self {
        let lifetime = TimeDelta::try_seconds(expires_in).unwrap_or(TimeDelta::MAX);
        let lifetime_end = issued_at
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let expires_at = lifetime_end
            .checked_sub_signed(TimeDelta::minutes(EXPIRY_MARGIN_MINUTES))
            .unwrap_or(issued_at);
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// The bearer value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// When the token stops being used.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token must be renewed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the token must be renewed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Request a new token from the tenant.
pub fn request_token(agent: &ureq::Agent, base_url: &str, credentials: &Credentials) -> Result<Token> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH);
    log::debug!("POST {}", TOKEN_PATH);

    let mut response = agent
        .post(&url)
        .send_form([
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ])
        .map_err(|e| Error::Auth(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.body_mut().read_to_string().unwrap_or_default();
        return Err(Error::Auth(format!("HTTP {}: {}", status.as_u16(), body.trim())));
    }

    let body: TokenResponse = response
        .body_mut()
        .read_json()
        .map_err(|e| Error::InvalidResponse(e.to_string()))?;

    Ok(Token::new(body.access_token, body.expires_in, Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_token_expires_fifteen_minutes_early() {
        let token = Token::new("abc", 3600, issued());

        assert_eq!(token.value(), "abc");
        assert_eq!(token.expires_at(), issued() + TimeDelta::minutes(45));
        assert!(!token.is_expired_at(issued() + TimeDelta::minutes(44)));
        assert!(token.is_expired_at(issued() + TimeDelta::minutes(45)));
    }

    #[test]
    fn test_short_lived_token_is_immediately_expired() {
        let token = Token::new("abc", 600, issued());
        assert!(token.is_expired_at(issued()));
    }

    #[test]
    fn test_huge_lifetime_is_clamped() {
        let token = Token::new("abc", i64::MAX / 1000, issued());
        assert!(!token.is_expired_at(issued()));
        assert!(token.expires_at() <= DateTime::<Utc>::MAX_UTC);

        let beyond_range = Token::new("abc", i64::MAX, issued());
        assert!(!beyond_range.is_expired_at(issued() + TimeDelta::days(365)));
    }

    #[test]
    fn test_negative_lifetime_is_expired() {
        let token = Token::new("abc", -60, issued());
        assert!(token.is_expired_at(issued()));
    }

    #[test]
    fn test_token_response_decodes() {
        let body: TokenResponse = serde_json::from_str(
            r#"{"access_token": "t0k3n", "token_type": "bearer", "expires_in": 3599, "scope": "x"}"#,
        )
        .unwrap();
        assert_eq!(body.access_token, "t0k3n");
        assert_eq!(body.expires_in, 3599);
    }
}
