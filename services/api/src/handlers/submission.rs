use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grading_auth_types::session::RequireSession;
use grading_domain::pagination::PageRequest;

use crate::domain::types::Submission;
use crate::error::ApiError;
use crate::handlers::active_ctx;
use crate::state::AppState;
use crate::usecase::submission::{
    ListSubmissionsUseCase, ServeFileUseCase, UploadSubmissionInput, UploadSubmissionUseCase,
};

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub id: String,
    pub student_id: String,
    pub schedule_id: String,
    pub object_key: String,
    pub content_type: String,
    pub size: i64,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id.to_string(),
            student_id: s.student_id.to_string(),
            schedule_id: s.schedule_id.to_string(),
            object_key: s.object_key,
            content_type: s.content_type,
            size: s.size,
            created_at: s.created_at,
        }
    }
}

// ── POST /submissions/upload ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UploadResponse {
    pub submission: SubmissionResponse,
    pub url: String,
}

/// Multipart fields: `schedule_id` (text) and `file` (the image).
pub async fn upload_submission(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let ctx = active_ctx(&state, &session).await?;

    let mut schedule_id: Option<Uuid> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::MissingData)?
    {
        let name = field.name().map(ToOwned::to_owned);
        match name.as_deref() {
            Some("schedule_id") => {
                let text = field.text().await.map_err(|_| ApiError::MissingData)?;
                schedule_id = Some(text.parse().map_err(|_| ApiError::MissingData)?);
            }
            Some("file") => {
                filename = field.file_name().map(ToOwned::to_owned);
                content_type = field.content_type().map(ToOwned::to_owned);
                bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|_| ApiError::FileTooLarge)?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let usecase = UploadSubmissionUseCase {
        submissions: state.submission_repo(),
        schedules: state.schedule_repo(),
        store: state.object_store(),
        jwt_secret: state.jwt_secret.clone(),
        public_base_url: state.public_base_url.clone(),
    };
    let out = usecase
        .execute(
            &ctx,
            UploadSubmissionInput {
                schedule_id: schedule_id.ok_or(ApiError::MissingData)?,
                filename,
                content_type: content_type.ok_or(ApiError::UnsupportedFileType)?,
                bytes: bytes.ok_or(ApiError::MissingData)?,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            submission: out.submission.into(),
            url: out.url,
        }),
    ))
}

// ── GET /submissions ──────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ListSubmissionsQuery {
    pub student_id: Option<Uuid>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_submissions(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<ListSubmissionsQuery>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let ctx = active_ctx(&state, &session).await?;
    let usecase = ListSubmissionsUseCase {
        submissions: state.submission_repo(),
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let submissions = usecase.execute(&ctx, query.student_id, page).await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

// ── GET /files/{*key} ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FileTokenQuery {
    pub token: Option<String>,
}

/// Signed-URL target. The token authorizes exactly one object key; no
/// session is consulted.
pub async fn serve_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<FileTokenQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let token = query.token.ok_or(ApiError::Forbidden)?;
    let usecase = ServeFileUseCase {
        submissions: state.submission_repo(),
        store: state.object_store(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let (bytes, content_type) = usecase.execute(&key, &token).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        bytes,
    ))
}
