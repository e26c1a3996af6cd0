use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grading_auth_types::session::RequireSession;
use grading_domain::pagination::PageRequest;

use crate::domain::types::Course;
use crate::error::ApiError;
use crate::handlers::active_ctx;
use crate::state::AppState;
use crate::usecase::course::{
    AssignTeacherUseCase, CreateCourseInput, CreateCourseUseCase, DeleteCourseUseCase,
    EnrollStudentUseCase, GetCourseUseCase, ListCoursesUseCase, UnassignTeacherUseCase,
    UnenrollStudentUseCase, UpdateCourseInput, UpdateCourseUseCase,
};

#[derive(Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name,
            description: c.description,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl ListQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            per_page: self.per_page.unwrap_or(25),
            page: self.page.unwrap_or(1),
        }
    }
}

// ── POST /courses ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCourseRequest {
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_course(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Json(body): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = CreateCourseUseCase {
        courses: state.course_repo(),
    };
    let course = usecase
        .execute(
            &ctx,
            CreateCourseInput {
                name: body.name,
                description: body.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

// ── GET /courses ──────────────────────────────────────────────────────────────

pub async fn list_courses(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = ListCoursesUseCase {
        courses: state.course_repo(),
    };
    let courses = usecase.execute(&ctx, query.page_request()).await?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

// ── GET /courses/{id} ─────────────────────────────────────────────────────────

pub async fn get_course(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseResponse>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = GetCourseUseCase {
        courses: state.course_repo(),
    };
    let course = usecase.execute(&ctx, course_id).await?;
    Ok(Json(course.into()))
}

// ── PATCH /courses/{id} ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn update_course(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(body): Json<UpdateCourseRequest>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = UpdateCourseUseCase {
        courses: state.course_repo(),
    };
    usecase
        .execute(
            &ctx,
            course_id,
            UpdateCourseInput {
                name: body.name,
                description: body.description,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /courses/{id} ──────────────────────────────────────────────────────

pub async fn delete_course(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = DeleteCourseUseCase {
        courses: state.course_repo(),
    };
    usecase.execute(&ctx, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT/DELETE /courses/{id}/teachers/{teacher_id} ────────────────────────────

pub async fn assign_teacher(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path((course_id, teacher_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = AssignTeacherUseCase {
        courses: state.course_repo(),
        profiles: state.profile_repo(),
    };
    usecase.execute(&ctx, course_id, teacher_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_teacher(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path((course_id, teacher_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = UnassignTeacherUseCase {
        courses: state.course_repo(),
    };
    usecase.execute(&ctx, course_id, teacher_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT/DELETE /courses/{id}/students/{student_id} ────────────────────────────

pub async fn enroll_student(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = EnrollStudentUseCase {
        courses: state.course_repo(),
        profiles: state.profile_repo(),
    };
    usecase.execute(&ctx, course_id, student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unenroll_student(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = UnenrollStudentUseCase {
        courses: state.course_repo(),
    };
    usecase.execute(&ctx, course_id, student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
