pub mod auth;
pub mod course;
pub mod element;
pub mod evaluation;
pub mod page;
pub mod preference;
pub mod schedule;
pub mod submission;
pub mod unit;
pub mod user;

use grading_auth_types::session::SessionIdentity;
use grading_domain::policy::AccessContext;

use crate::domain::types::Actor;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::actor::{LoadActorUseCase, active_context, require_admin};

pub(crate) async fn load_actor(state: &AppState, session: &SessionIdentity) -> Result<Actor, ApiError> {
    let usecase = LoadActorUseCase {
        identities: state.identity_repo(),
        profiles: state.profile_repo(),
    };
    usecase.execute(session.identity_id).await
}

/// Session → gated policy context. 401 without an identity row, 403 until
/// both gates pass (admins bypass approval).
pub(crate) async fn active_ctx(
    state: &AppState,
    session: &SessionIdentity,
) -> Result<AccessContext, ApiError> {
    let actor = load_actor(state, session).await?;
    active_context(&actor)
}

pub(crate) async fn admin_ctx(
    state: &AppState,
    session: &SessionIdentity,
) -> Result<AccessContext, ApiError> {
    let actor = load_actor(state, session).await?;
    require_admin(&actor)
}
