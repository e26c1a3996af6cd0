use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{AuthCodeRepository, IdentityRepository};
use crate::domain::types::{AuthCodeKind, Identity, validate_email};
use crate::error::ApiError;
use crate::usecase::authcode::{log_code_event, new_code};

pub struct SignupInput {
    pub email: String,
}

pub struct SignupUseCase<I, A>
where
    I: IdentityRepository,
    A: AuthCodeRepository,
{
    pub identities: I,
    pub auth_codes: A,
}

impl<I, A> SignupUseCase<I, A>
where
    I: IdentityRepository,
    A: AuthCodeRepository,
{
    /// Create the identity and issue a signup-confirm code. The caller gets
    /// a session immediately — the email-confirmation gate keeps it out of
    /// protected areas until the code is redeemed.
    pub async fn execute(&self, input: SignupInput) -> Result<Identity, ApiError> {
        if !validate_email(&input.email) {
            return Err(ApiError::InvalidEmail);
        }
        if self
            .identities
            .find_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(ApiError::EmailTaken);
        }

        let now = Utc::now();
        let identity = Identity {
            id: Uuid::now_v7(),
            email: input.email.trim().to_owned(),
            email_confirmed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.identities.create(&identity).await?;

        let code = new_code(identity.id, AuthCodeKind::SignupConfirm);
        self.auth_codes.create(&code).await?;
        log_code_event("signup_confirm", &identity.email, &code);

        Ok(identity)
    }
}
