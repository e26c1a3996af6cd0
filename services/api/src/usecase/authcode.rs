use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{AuthCodeRepository, IdentityRepository};
use crate::domain::types::{
    AUTHCODE_LEN, AUTHCODE_TTL_SECS, AuthCode, AuthCodeKind, MAX_ACTIVE_AUTHCODES,
};
use crate::error::ApiError;

/// Charset for generating random auth codes (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..AUTHCODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Build a fresh code record for `identity_id`.
pub(crate) fn new_code(identity_id: Uuid, kind: AuthCodeKind) -> AuthCode {
    let now = Utc::now();
    AuthCode {
        id: Uuid::new_v4(),
        identity_id,
        code: generate_code(),
        kind,
        expires_at: now + Duration::seconds(AUTHCODE_TTL_SECS),
        used_at: None,
        created_at: now,
    }
}

/// Record the code for delivery. E-mail dispatch is an external concern; the
/// structured event is the hand-off point.
pub(crate) fn log_code_event(kind: &str, email: &str, code: &AuthCode) {
    tracing::info!(
        event = "auth_code_created",
        kind,
        email,
        code = %code.code,
        code_id = %code.id,
        "auth code issued"
    );
}

pub struct CreateAuthcodeInput {
    pub email: String,
}

pub struct CreateAuthcodeUseCase<I, A>
where
    I: IdentityRepository,
    A: AuthCodeRepository,
{
    pub identities: I,
    pub auth_codes: A,
}

impl<I, A> CreateAuthcodeUseCase<I, A>
where
    I: IdentityRepository,
    A: AuthCodeRepository,
{
    pub async fn execute(&self, input: CreateAuthcodeInput) -> Result<(), ApiError> {
        // 1. Find identity by email → 404 if not found
        let identity = self
            .identities
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::IdentityNotFound)?;

        // 2. Check active code limit → 429 at or over limit
        let active = self
            .auth_codes
            .count_active(identity.id, AuthCodeKind::Login)
            .await?;
        if active >= MAX_ACTIVE_AUTHCODES {
            return Err(ApiError::TooManyAuthcodes);
        }

        // 3. Generate and persist
        let code = new_code(identity.id, AuthCodeKind::Login);
        self.auth_codes.create(&code).await?;
        log_code_event("login", &input.email, &code);
        Ok(())
    }
}
