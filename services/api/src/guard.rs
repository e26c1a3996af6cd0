//! Route guard for page navigation.
//!
//! Recomputes the navigation state from the identity and profile rows on
//! every request and applies the redirect table. Resolution failures read as
//! anonymous: routing protection fails closed, unlike the fail-open profile
//! badge path in `usecase::profile::LoadProfileUseCase`.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use grading_auth_types::cookie::{ACCESS_TOKEN_ROTATE_WINDOW, access_token_cookie};
use grading_auth_types::session::{Session, SessionIdentity};
use grading_domain::route::{AccessState, GateFacts, RouteDecision, RouteTarget, route_decision};

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::actor::LoadActorUseCase;
use crate::usecase::token::issue_access_token;

/// Classify a page path. Anything not on the public list is protected.
pub fn classify(path: &str) -> RouteTarget {
    match path {
        "/" => RouteTarget::Root,
        "/login" => RouteTarget::Login,
        "/signup" => RouteTarget::Signup,
        "/verify-email" => RouteTarget::VerifyEmail,
        "/waiting-approval" => RouteTarget::WaitingApproval,
        _ => RouteTarget::Protected,
    }
}

async fn resolve_facts(
    state: &AppState,
    identity_id: Uuid,
) -> Result<Option<GateFacts>, ApiError> {
    let usecase = LoadActorUseCase {
        identities: state.identity_repo(),
        profiles: state.profile_repo(),
    };
    match usecase.execute(identity_id).await {
        Ok(actor) => Ok(Some(actor.gate_facts())),
        // Token for a deleted identity: anonymous, not an error.
        Err(ApiError::Unauthorized) => Ok(None),
        Err(e) => Err(e),
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Re-issue the access cookie when a valid session is close to expiry.
/// Silent: the page response is untouched apart from `Set-Cookie`.
fn maybe_rotate(state: &AppState, session: &Option<SessionIdentity>, response: &mut Response) {
    let Some(session) = session else { return };
    let now = now_secs();
    if session.access_token_exp <= now {
        return;
    }
    if session.access_token_exp - now >= ACCESS_TOKEN_ROTATE_WINDOW {
        return;
    }
    match issue_access_token(session.identity_id, &session.email, &state.jwt_secret) {
        Ok((token, _)) => {
            let cookie = access_token_cookie(token, state.cookie_domain.clone());
            if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "session rotation failed, keeping current cookie");
        }
    }
}

pub async fn route_guard(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let target = classify(request.uri().path());

    let facts = match &session.0 {
        None => None,
        Some(s) => match resolve_facts(&state, s.identity_id).await {
            Ok(facts) => facts,
            Err(e) => {
                tracing::warn!(error = %e, "guard state resolution failed, failing closed");
                None
            }
        },
    };
    let access_state = AccessState::resolve(facts);

    match route_decision(access_state, target) {
        RouteDecision::Allow => {
            let mut response = next.run(request).await;
            maybe_rotate(&state, &session.0, &mut response);
            response
        }
        RouteDecision::ToLogin => Redirect::to("/login").into_response(),
        RouteDecision::ToVerifyEmail => Redirect::to("/verify-email").into_response(),
        RouteDecision::ToWaitingApproval => Redirect::to("/waiting-approval").into_response(),
        RouteDecision::ToDashboard => Redirect::to("/dashboard").into_response(),
    }
}
