use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use grading_auth_types::cookie::{ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP};
use grading_auth_types::token::{JwtClaims, validate_token};

use crate::domain::repository::{AuthCodeRepository, IdentityRepository};
use crate::domain::types::AuthCodeKind;
use crate::error::ApiError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

fn issue_token(
    identity_id: Uuid,
    email: &str,
    secret: &str,
    lifetime: u64,
) -> Result<(String, u64), ApiError> {
    let exp = now_secs() + lifetime;
    let claims = JwtClaims {
        sub: identity_id.to_string(),
        email: email.to_owned(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))?;
    Ok((token, exp))
}

pub fn issue_access_token(
    identity_id: Uuid,
    email: &str,
    secret: &str,
) -> Result<(String, u64), ApiError> {
    issue_token(identity_id, email, secret, ACCESS_TOKEN_EXP)
}

pub fn issue_refresh_token(identity_id: Uuid, email: &str, secret: &str) -> Result<String, ApiError> {
    issue_token(identity_id, email, secret, REFRESH_TOKEN_EXP).map(|(token, _)| token)
}

// ── CreateToken (login) ───────────────────────────────────────────────────────

pub struct CreateTokenInput {
    pub email: String,
    pub code: String,
}

#[derive(Debug)]
pub struct CreateTokenOutput {
    pub identity_id: Uuid,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct CreateTokenUseCase<I: IdentityRepository, A: AuthCodeRepository> {
    pub identities: I,
    pub auth_codes: A,
    pub jwt_secret: String,
}

impl<I: IdentityRepository, A: AuthCodeRepository> CreateTokenUseCase<I, A> {
    pub async fn execute(&self, input: CreateTokenInput) -> Result<CreateTokenOutput, ApiError> {
        let identity = self
            .identities
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::IdentityNotFound)?;

        let auth_code = self
            .auth_codes
            .find_valid(identity.id, &input.code, AuthCodeKind::Login)
            .await?
            .ok_or(ApiError::InvalidAuthcode)?;

        self.auth_codes.mark_used(auth_code.id).await?;

        let (access_token, access_token_exp) =
            issue_access_token(identity.id, &identity.email, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(identity.id, &identity.email, &self.jwt_secret)?;

        Ok(CreateTokenOutput {
            identity_id: identity.id,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshTokenOutput {
    pub identity_id: Uuid,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct RefreshTokenUseCase<I: IdentityRepository> {
    pub identities: I,
    pub jwt_secret: String,
}

impl<I: IdentityRepository> RefreshTokenUseCase<I> {
    pub async fn execute(&self, refresh_token_value: &str) -> Result<RefreshTokenOutput, ApiError> {
        // Validate refresh token (sig + exp); an expired access token is
        // irrelevant here.
        let claims = validate_token(refresh_token_value, &self.jwt_secret)
            .map_err(|_| ApiError::InvalidRefreshToken)?;

        let identity_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| ApiError::InvalidRefreshToken)?;

        let identity = self
            .identities
            .find_by_id(identity_id)
            .await?
            .ok_or(ApiError::InvalidRefreshToken)?;

        let (access_token, access_token_exp) =
            issue_access_token(identity.id, &identity.email, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(identity.id, &identity.email, &self.jwt_secret)?;

        Ok(RefreshTokenOutput {
            identity_id: identity.id,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}
