use chrono::Utc;
use uuid::Uuid;

use grading_domain::pagination::PageRequest;
use grading_domain::role::Role;

use crate::domain::repository::{IdentityRepository, ProfileRepository};
use crate::domain::types::{Identity, Profile, validate_email};
use crate::error::ApiError;

// ── CheckEmail ───────────────────────────────────────────────────────────────

pub struct CheckEmailUseCase<I: IdentityRepository> {
    pub identities: I,
}

impl<I: IdentityRepository> CheckEmailUseCase<I> {
    pub async fn execute(&self, email: &str) -> Result<bool, ApiError> {
        if !validate_email(email) {
            return Err(ApiError::InvalidEmail);
        }
        Ok(self.identities.find_by_email(email.trim()).await?.is_some())
    }
}

// ── CreateProfile ────────────────────────────────────────────────────────────

pub struct CreateProfileInput {
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

pub struct CreateProfileUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> CreateProfileUseCase<P> {
    /// Lazy, idempotent profile creation. The second call for the same
    /// identity returns the existing row unchanged. Admin profiles are never
    /// created here — they are pre-provisioned.
    pub async fn execute(
        &self,
        identity: &Identity,
        input: CreateProfileInput,
    ) -> Result<(Profile, bool), ApiError> {
        if input.role == Role::Admin {
            return Err(ApiError::AdminRoleReserved);
        }
        if let Some(existing) = self.profiles.find_by_id(identity.id).await? {
            return Ok((existing, false));
        }
        if input.full_name.trim().is_empty() {
            return Err(ApiError::MissingData);
        }

        let now = Utc::now();
        let profile = Profile {
            id: identity.id,
            email: identity.email.clone(),
            full_name: input.full_name,
            phone: input.phone,
            role: input.role,
            approved: false,
            created_at: now,
            updated_at: now,
        };
        self.profiles.create(&profile).await?;
        Ok((profile, true))
    }
}

// ── LoadProfile (fail-open) ──────────────────────────────────────────────────

pub struct LoadProfileUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> LoadProfileUseCase<P> {
    /// Missing row is `None`, not an error — the lazy-creation trigger.
    /// Repository failure is logged and also reads as `None`: the consumers
    /// are decorative surfaces, and an internal failure must not block them.
    /// The route guard deliberately does NOT share this behavior.
    pub async fn execute(&self, identity_id: Uuid) -> Option<Profile> {
        match self.profiles.find_by_id(identity_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, %identity_id, "profile load failed, treating as missing");
                None
            }
        }
    }
}

// ── UpdateMe ─────────────────────────────────────────────────────────────────

pub struct UpdateMeInput {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

pub struct UpdateMeUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> UpdateMeUseCase<P> {
    /// Owner-scoped profile edit. `role` and `approved` are not accepted by
    /// construction — only admins touch approval, nobody edits role.
    pub async fn execute(&self, identity_id: Uuid, input: UpdateMeInput) -> Result<(), ApiError> {
        if input.full_name.is_none() && input.phone.is_none() {
            return Err(ApiError::MissingData);
        }
        if self.profiles.find_by_id(identity_id).await?.is_none() {
            return Err(ApiError::ProfileNotFound);
        }
        self.profiles
            .update_contact(
                identity_id,
                input.full_name.as_deref(),
                input.phone.as_deref(),
            )
            .await
    }
}

// ── ListProfiles (admin) ─────────────────────────────────────────────────────

pub struct ListProfilesUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> ListProfilesUseCase<P> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<Profile>, ApiError> {
        self.profiles.list(page).await
    }
}

// ── SetApproval (admin) ──────────────────────────────────────────────────────

pub struct SetApprovalUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> SetApprovalUseCase<P> {
    pub async fn execute(&self, profile_id: Uuid, approved: bool) -> Result<(), ApiError> {
        let found = self.profiles.set_approved(profile_id, approved).await?;
        if !found {
            return Err(ApiError::ProfileNotFound);
        }
        Ok(())
    }
}
