use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grading_auth_types::session::RequireSession;
use grading_domain::pagination::PageRequest;

use crate::domain::types::CompetencyUnit;
use crate::error::ApiError;
use crate::handlers::active_ctx;
use crate::state::AppState;
use crate::usecase::unit::{
    CreateUnitInput, CreateUnitUseCase, DeleteUnitUseCase, GetUnitUseCase, ListUnitsUseCase,
    UpdateUnitInput, UpdateUnitUseCase,
};

#[derive(Serialize)]
pub struct UnitResponse {
    pub id: String,
    pub course_id: String,
    pub code: String,
    pub title: String,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<CompetencyUnit> for UnitResponse {
    fn from(u: CompetencyUnit) -> Self {
        Self {
            id: u.id.to_string(),
            course_id: u.course_id.to_string(),
            code: u.code,
            title: u.title,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

// ── POST /competency-units ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUnitRequest {
    pub course_id: Uuid,
    pub code: String,
    pub title: String,
}

pub async fn create_unit(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Json(body): Json<CreateUnitRequest>,
) -> Result<(StatusCode, Json<UnitResponse>), ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = CreateUnitUseCase {
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    let unit = usecase
        .execute(
            &ctx,
            CreateUnitInput {
                course_id: body.course_id,
                code: body.code,
                title: body.title,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(unit.into())))
}

// ── GET /competency-units?course-id= ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListUnitsQuery {
    pub course_id: Uuid,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_units(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<ListUnitsQuery>,
) -> Result<Json<Vec<UnitResponse>>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = ListUnitsUseCase {
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let units = usecase.execute(&ctx, query.course_id, page).await?;
    Ok(Json(units.into_iter().map(Into::into).collect()))
}

// ── GET /competency-units/{id} ────────────────────────────────────────────────

pub async fn get_unit(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> Result<Json<UnitResponse>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = GetUnitUseCase {
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    let unit = usecase.execute(&ctx, unit_id).await?;
    Ok(Json(unit.into()))
}

// ── PATCH /competency-units/{id} ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUnitRequest {
    pub code: Option<String>,
    pub title: Option<String>,
}

pub async fn update_unit(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(body): Json<UpdateUnitRequest>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = UpdateUnitUseCase {
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    usecase
        .execute(
            &ctx,
            unit_id,
            UpdateUnitInput {
                code: body.code,
                title: body.title,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /competency-units/{id} ─────────────────────────────────────────────

pub async fn delete_unit(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = DeleteUnitUseCase {
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    usecase.execute(&ctx, unit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
