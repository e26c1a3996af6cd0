use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use grading_auth_types::session::RequireSession;

use crate::domain::types::Theme;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::preference::{GetPreferenceUseCase, SetPreferenceUseCase};

#[derive(Serialize)]
pub struct PreferenceResponse {
    pub theme: Theme,
}

// ── GET /user/preferences ─────────────────────────────────────────────────────

pub async fn get_preferences(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
) -> Result<Json<PreferenceResponse>, ApiError> {
    let usecase = GetPreferenceUseCase {
        preferences: state.preference_repo(),
    };
    let theme = usecase.execute(session.identity_id).await?;
    Ok(Json(PreferenceResponse { theme }))
}

// ── POST /user/preferences ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetPreferenceRequest {
    pub theme: Option<String>,
}

pub async fn set_preferences(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Json(body): Json<SetPreferenceRequest>,
) -> Result<StatusCode, ApiError> {
    // Theme is validated by the closed enum: unknown strings are 400.
    let theme = body
        .theme
        .as_deref()
        .and_then(Theme::parse)
        .ok_or(ApiError::InvalidTheme)?;
    let usecase = SetPreferenceUseCase {
        preferences: state.preference_repo(),
    };
    usecase.execute(session.identity_id, theme).await?;
    Ok(StatusCode::NO_CONTENT)
}
