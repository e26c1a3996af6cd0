use uuid::Uuid;

use grading_domain::policy::AccessContext;
use grading_domain::role::Role;

use crate::domain::repository::{IdentityRepository, ProfileRepository};
use crate::domain::types::Actor;
use crate::error::ApiError;

/// Resolve the request's actor from a session identity id.
///
/// Recomputed per request: the identity row must still exist (a token for a
/// deleted identity is 401), the profile row may be missing. Repository
/// failures propagate — API callers answer 500, while the route guard maps
/// any failure to anonymous (fail-closed).
pub struct LoadActorUseCase<I, P>
where
    I: IdentityRepository,
    P: ProfileRepository,
{
    pub identities: I,
    pub profiles: P,
}

impl<I, P> LoadActorUseCase<I, P>
where
    I: IdentityRepository,
    P: ProfileRepository,
{
    pub async fn execute(&self, identity_id: Uuid) -> Result<Actor, ApiError> {
        let identity = self
            .identities
            .find_by_id(identity_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        let profile = self.profiles.find_by_id(identity_id).await?;
        Ok(Actor { identity, profile })
    }
}

/// Apply the global gate and return the policy context.
///
/// Admins bypass the approval gate (pre-provisioned accounts); everyone else
/// needs a confirmed email and an approved profile.
pub fn active_context(actor: &Actor) -> Result<AccessContext, ApiError> {
    let ctx = actor.access_context().ok_or(ApiError::Forbidden)?;
    if ctx.role == Role::Admin {
        return Ok(ctx);
    }
    if !ctx.email_confirmed || !ctx.approved {
        return Err(ApiError::Forbidden);
    }
    Ok(ctx)
}

/// Admin-or-403 shortcut for administrative routes.
pub fn require_admin(actor: &Actor) -> Result<AccessContext, ApiError> {
    let ctx = active_context(actor)?;
    if ctx.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }
    Ok(ctx)
}
