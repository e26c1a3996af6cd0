use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use grading_auth_types::session::RequireSession;
use grading_domain::pagination::PageRequest;

use crate::error::ApiError;
use crate::handlers::{admin_ctx, auth::ProfileResponse};
use crate::state::AppState;
use crate::usecase::profile::{ListProfilesUseCase, SetApprovalUseCase, UpdateMeInput, UpdateMeUseCase};

// ── GET /users ────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ListUsersQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_users(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    admin_ctx(&state, &session).await?;
    let usecase = ListProfilesUseCase {
        profiles: state.profile_repo(),
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let profiles = usecase.execute(page).await?;
    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

// ── PATCH /users/{id}/approval ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetApprovalRequest {
    pub approved: bool,
}

pub async fn set_approval(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Json(body): Json<SetApprovalRequest>,
) -> Result<StatusCode, ApiError> {
    admin_ctx(&state, &session).await?;
    let usecase = SetApprovalUseCase {
        profiles: state.profile_repo(),
    };
    usecase.execute(profile_id, body.approved).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PATCH /users/@me ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

pub async fn update_me(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = UpdateMeUseCase {
        profiles: state.profile_repo(),
    };
    usecase
        .execute(
            session.identity_id,
            UpdateMeInput {
                full_name: body.full_name,
                phone: body.phone,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
