use axum::{
    Json,
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grading_auth_types::session::RequireSession;
use grading_domain::pagination::PageRequest;

use crate::domain::repository::EvaluationFilter;
use crate::domain::types::{Evaluation, EvaluationStatus};
use crate::error::ApiError;
use crate::handlers::active_ctx;
use crate::state::AppState;
use crate::usecase::evaluation::{
    CheckEvaluationUseCase, CreateEvaluationInput, CreateEvaluationUseCase, GetEvaluationUseCase,
    ListEvaluationsUseCase, UpdateEvaluationInput, UpdateEvaluationUseCase,
};

#[derive(Serialize)]
pub struct EvaluationResponse {
    pub id: String,
    pub student_id: String,
    pub teacher_id: String,
    pub unit_id: String,
    pub submission_id: Option<String>,
    pub status: EvaluationStatus,
    pub score: i32,
    pub feedback: Option<String>,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Evaluation> for EvaluationResponse {
    fn from(e: Evaluation) -> Self {
        Self {
            id: e.id.to_string(),
            student_id: e.student_id.to_string(),
            teacher_id: e.teacher_id.to_string(),
            unit_id: e.unit_id.to_string(),
            submission_id: e.submission_id.map(|id| id.to_string()),
            status: e.status,
            score: e.score,
            feedback: e.feedback,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

// ── POST /evaluations ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEvaluationRequest {
    pub student_id: Uuid,
    pub unit_id: Uuid,
    pub score: Option<i32>,
    pub feedback: Option<String>,
}

pub async fn create_evaluation(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Json(body): Json<CreateEvaluationRequest>,
) -> Result<(StatusCode, Json<EvaluationResponse>), ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = CreateEvaluationUseCase {
        evaluations: state.evaluation_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    let evaluation = usecase
        .execute(
            &ctx,
            CreateEvaluationInput {
                student_id: body.student_id,
                unit_id: body.unit_id,
                score: body.score,
                feedback: body.feedback,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(evaluation.into())))
}

// ── GET /evaluations ──────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ListEvaluationsQuery {
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_evaluations(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<EvaluationResponse>>, ApiError> {
    let query: ListEvaluationsQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| ApiError::MissingData)?
        .unwrap_or_default();

    let ctx = active_ctx(&state, &session).await?;
    let usecase = ListEvaluationsUseCase {
        evaluations: state.evaluation_repo(),
    };
    let filter = EvaluationFilter {
        student_id: query.student_id,
        teacher_id: query.teacher_id,
        unit_id: query.unit_id,
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let evaluations = usecase.execute(&ctx, filter, page).await?;
    Ok(Json(evaluations.into_iter().map(Into::into).collect()))
}

// ── GET /evaluations/check ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CheckEvaluationQuery {
    pub student_id: Uuid,
    pub unit_id: Uuid,
}

#[derive(Serialize)]
pub struct CheckEvaluationResponse {
    pub exists: bool,
}

pub async fn check_evaluation(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<CheckEvaluationQuery>,
) -> Result<Json<CheckEvaluationResponse>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = CheckEvaluationUseCase {
        evaluations: state.evaluation_repo(),
    };
    let exists = usecase
        .execute(&ctx, query.student_id, query.unit_id)
        .await?;
    Ok(Json(CheckEvaluationResponse { exists }))
}

// ── GET /evaluations/{id} ─────────────────────────────────────────────────────

pub async fn get_evaluation(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(evaluation_id): Path<Uuid>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = GetEvaluationUseCase {
        evaluations: state.evaluation_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    let evaluation = usecase.execute(&ctx, evaluation_id).await?;
    Ok(Json(evaluation.into()))
}

// ── PATCH /evaluations/{id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateEvaluationRequest {
    pub status: Option<EvaluationStatus>,
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub submission_id: Option<Uuid>,
}

pub async fn update_evaluation(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(evaluation_id): Path<Uuid>,
    Json(body): Json<UpdateEvaluationRequest>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = UpdateEvaluationUseCase {
        evaluations: state.evaluation_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
        submissions: state.submission_repo(),
    };
    let evaluation = usecase
        .execute(
            &ctx,
            evaluation_id,
            UpdateEvaluationInput {
                status: body.status,
                score: body.score,
                feedback: body.feedback,
                submission_id: body.submission_id,
            },
        )
        .await?;
    Ok(Json(evaluation.into()))
}
