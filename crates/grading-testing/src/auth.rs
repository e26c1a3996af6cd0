//! Mock session helpers for integration tests.
//!
//! Handlers resolve identity from the signed `grading_access_token` cookie.
//! `MockSession` mints a real signed token for a chosen identity so tests
//! exercise the same validation path as production requests.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use grading_auth_types::cookie::GRADING_ACCESS_TOKEN;
use grading_auth_types::token::JwtClaims;

/// Configurable identity injected into test requests as a session cookie.
pub struct MockSession {
    pub identity_id: Uuid,
    pub email: String,
    pub jwt_secret: String,
}

impl MockSession {
    pub fn new(identity_id: Uuid, email: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            identity_id,
            email: email.into(),
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Mint a signed access token expiring one hour from now.
    pub fn token(&self) -> String {
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock before UNIX epoch")
            .as_secs()
            + 3600;
        let claims = JwtClaims {
            sub: self.identity_id.to_string(),
            email: self.email.clone(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .expect("encode test JWT")
    }

    /// Return headers carrying the session cookie.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("cookie"),
            HeaderValue::from_str(&format!("{GRADING_ACCESS_TOKEN}={}", self.token())).unwrap(),
        );
        map
    }
}
