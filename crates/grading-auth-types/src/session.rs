//! Session resolver extractors.
//!
//! [`Session`] never rejects — absent, malformed, or expired cookies all
//! degrade to anonymous. [`RequireSession`] is the 401-on-missing variant
//! for API routes that make no sense without an identity.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum_extra::extract::CookieJar;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::cookie::GRADING_ACCESS_TOKEN;
use crate::token::validate_access_token;

/// Authenticated identity resolved from the access-token cookie.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub identity_id: Uuid,
    pub email: String,
    pub access_token_exp: u64,
}

/// State capable of providing the JWT signing secret to the extractors.
pub trait JwtSecretProvider {
    fn jwt_secret(&self) -> &str;
}

/// Optional session: `Session(None)` for anonymous requests.
#[derive(Debug, Clone)]
pub struct Session(pub Option<SessionIdentity>);

fn resolve(parts: &Parts, secret: &str) -> Option<SessionIdentity> {
    let jar = CookieJar::from_headers(&parts.headers);
    let value = jar.get(GRADING_ACCESS_TOKEN)?.value().to_owned();
    match validate_access_token(&value, secret) {
        Ok(info) => Some(SessionIdentity {
            identity_id: info.identity_id,
            email: info.email,
            access_token_exp: info.access_token_exp,
        }),
        Err(e) => {
            tracing::debug!(error = %e, "session cookie rejected, treating as anonymous");
            None
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: JwtSecretProvider + Send + Sync,
{
    type Rejection = Infallible;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`),
    // so extract synchronously and return a 'static async block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let session = resolve(parts, state.jwt_secret());
        async move { Ok(Self(session)) }
    }
}

/// Required session: rejects with 401 when no valid identity is present.
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionIdentity);

impl<S> FromRequestParts<S> for RequireSession
where
    S: JwtSecretProvider + Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let session = resolve(parts, state.jwt_secret());
        async move {
            let identity = session.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self(identity))
        }
    }
}
