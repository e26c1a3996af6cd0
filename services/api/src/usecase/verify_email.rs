use uuid::Uuid;

use crate::domain::repository::{AuthCodeRepository, IdentityRepository};
use crate::domain::types::AuthCodeKind;
use crate::error::ApiError;

pub struct VerifyEmailInput {
    pub code: String,
}

pub struct VerifyEmailUseCase<I, A>
where
    I: IdentityRepository,
    A: AuthCodeRepository,
{
    pub identities: I,
    pub auth_codes: A,
}

impl<I, A> VerifyEmailUseCase<I, A>
where
    I: IdentityRepository,
    A: AuthCodeRepository,
{
    /// Redeem a signup-confirm code for the calling identity and stamp
    /// `email_confirmed_at`. Idempotent at the identity level: a second
    /// confirmation leaves the original stamp.
    pub async fn execute(&self, identity_id: Uuid, input: VerifyEmailInput) -> Result<(), ApiError> {
        let code = self
            .auth_codes
            .find_valid(identity_id, &input.code, AuthCodeKind::SignupConfirm)
            .await?
            .ok_or(ApiError::InvalidAuthcode)?;

        self.auth_codes.mark_used(code.id).await?;
        self.identities.confirm_email(identity_id).await?;
        Ok(())
    }
}
