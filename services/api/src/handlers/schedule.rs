use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grading_auth_types::session::RequireSession;
use grading_domain::pagination::PageRequest;

use crate::domain::types::{EvaluationSchedule, ScheduleStatus};
use crate::error::ApiError;
use crate::handlers::active_ctx;
use crate::state::AppState;
use crate::usecase::schedule::{
    CreateScheduleInput, CreateScheduleUseCase, ListSchedulesUseCase, SetScheduleStatusUseCase,
};

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    pub status: ScheduleStatus,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<EvaluationSchedule> for ScheduleResponse {
    fn from(s: EvaluationSchedule) -> Self {
        Self {
            id: s.id.to_string(),
            unit_id: s.unit_id.to_string(),
            title: s.title,
            status: s.status,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

// ── POST /evaluation-schedules ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateScheduleRequest {
    pub unit_id: Uuid,
    pub title: String,
}

pub async fn create_schedule(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Json(body): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleResponse>), ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = CreateScheduleUseCase {
        schedules: state.schedule_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    let schedule = usecase
        .execute(
            &ctx,
            CreateScheduleInput {
                unit_id: body.unit_id,
                title: body.title,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(schedule.into())))
}

// ── GET /evaluation-schedules?unit-id= ────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListSchedulesQuery {
    pub unit_id: Uuid,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_schedules(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<ListSchedulesQuery>,
) -> Result<Json<Vec<ScheduleResponse>>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = ListSchedulesUseCase {
        schedules: state.schedule_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let schedules = usecase.execute(&ctx, query.unit_id, page).await?;
    Ok(Json(schedules.into_iter().map(Into::into).collect()))
}

// ── PATCH /evaluation-schedules/{id} ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetScheduleStatusRequest {
    pub status: ScheduleStatus,
}

pub async fn set_schedule_status(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
    Json(body): Json<SetScheduleStatusRequest>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = SetScheduleStatusUseCase {
        schedules: state.schedule_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    usecase.execute(&ctx, schedule_id, body.status).await?;
    Ok(StatusCode::NO_CONTENT)
}
