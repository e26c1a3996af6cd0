use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grading_auth_types::session::RequireSession;
use grading_domain::pagination::PageRequest;

use crate::domain::types::CompetencyElement;
use crate::error::ApiError;
use crate::handlers::active_ctx;
use crate::state::AppState;
use crate::usecase::element::{
    CreateElementInput, CreateElementUseCase, DeleteElementUseCase, GetElementUseCase,
    ListElementsUseCase, UpdateElementInput, UpdateElementUseCase,
};

#[derive(Serialize)]
pub struct ElementResponse {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    pub max_score: i32,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<CompetencyElement> for ElementResponse {
    fn from(e: CompetencyElement) -> Self {
        Self {
            id: e.id.to_string(),
            unit_id: e.unit_id.to_string(),
            title: e.title,
            max_score: e.max_score,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

// ── POST /competency-elements ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateElementRequest {
    pub unit_id: Uuid,
    pub title: String,
    pub max_score: Option<i32>,
}

pub async fn create_element(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Json(body): Json<CreateElementRequest>,
) -> Result<(StatusCode, Json<ElementResponse>), ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = CreateElementUseCase {
        elements: state.element_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    let element = usecase
        .execute(
            &ctx,
            CreateElementInput {
                unit_id: body.unit_id,
                title: body.title,
                max_score: body.max_score.unwrap_or(100),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(element.into())))
}

// ── GET /competency-elements?unit-id= ─────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListElementsQuery {
    pub unit_id: Uuid,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_elements(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<ListElementsQuery>,
) -> Result<Json<Vec<ElementResponse>>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = ListElementsUseCase {
        elements: state.element_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let elements = usecase.execute(&ctx, query.unit_id, page).await?;
    Ok(Json(elements.into_iter().map(Into::into).collect()))
}

// ── GET /competency-elements/{id} ─────────────────────────────────────────────

pub async fn get_element(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(element_id): Path<Uuid>,
) -> Result<Json<ElementResponse>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = GetElementUseCase {
        elements: state.element_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    let element = usecase.execute(&ctx, element_id).await?;
    Ok(Json(element.into()))
}

// ── PATCH /competency-elements/{id} ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateElementRequest {
    pub title: Option<String>,
    pub max_score: Option<i32>,
}

pub async fn update_element(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(element_id): Path<Uuid>,
    Json(body): Json<UpdateElementRequest>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = UpdateElementUseCase {
        elements: state.element_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    usecase
        .execute(
            &ctx,
            element_id,
            UpdateElementInput {
                title: body.title,
                max_score: body.max_score,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /competency-elements/{id} ──────────────────────────────────────────

pub async fn delete_element(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(element_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = DeleteElementUseCase {
        elements: state.element_repo(),
        units: state.unit_repo(),
        courses: state.course_repo(),
    };
    usecase.execute(&ctx, element_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
