use chrono::Utc;
use uuid::Uuid;

use grading_domain::pagination::PageRequest;
use grading_domain::policy::{AccessContext, Action, Resource, can_access};

use crate::domain::repository::{
    ObjectStorePort, ScheduleRepository, SubmissionRepository,
};
use crate::domain::types::{MAX_UPLOAD_BYTES, ScheduleStatus, Submission};
use crate::error::ApiError;
use crate::infra::storage::{sign_object_key, signed_url};

/// Pick the stored file extension: the original filename wins, the MIME
/// subtype is the fallback, and anything unusable becomes "bin".
fn file_extension(filename: Option<&str>, content_type: &str) -> String {
    let from_name = filename
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext))
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    let ext = match from_name {
        Some(ext) => ext,
        None => content_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin"),
    };
    ext.to_ascii_lowercase()
}

// ── UploadSubmission ─────────────────────────────────────────────────────────

pub struct UploadSubmissionInput {
    pub schedule_id: Uuid,
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct UploadSubmissionOutput {
    pub submission: Submission,
    pub url: String,
}

pub struct UploadSubmissionUseCase<
    S: SubmissionRepository,
    Sc: ScheduleRepository,
    O: ObjectStorePort,
> {
    pub submissions: S,
    pub schedules: Sc,
    pub store: O,
    pub jwt_secret: String,
    pub public_base_url: String,
}

impl<S: SubmissionRepository, Sc: ScheduleRepository, O: ObjectStorePort>
    UploadSubmissionUseCase<S, Sc, O>
{
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        input: UploadSubmissionInput,
    ) -> Result<UploadSubmissionOutput, ApiError> {
        let schedule = self
            .schedules
            .find_by_id(input.schedule_id)
            .await?
            .ok_or(ApiError::ScheduleNotFound)?;

        // Validation errors answer 400 before any access decision: exactly
        // MAX_UPLOAD_BYTES passes, one more byte fails.
        if !input.content_type.starts_with("image/") {
            return Err(ApiError::UnsupportedFileType);
        }
        if input.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::FileTooLarge);
        }

        let resource = Resource::Submission {
            student_id: ctx.user_id,
            schedule_open: schedule.status == ScheduleStatus::Open,
        };
        if !can_access(ctx, &resource, Action::Create) {
            return Err(ApiError::Forbidden);
        }

        let now = Utc::now();
        let ext = file_extension(input.filename.as_deref(), &input.content_type);
        let object_key = format!("{}/{}.{}", ctx.user_id, now.timestamp_millis(), ext);

        self.store.put(&object_key, &input.bytes).await?;

        let submission = Submission {
            id: Uuid::now_v7(),
            student_id: ctx.user_id,
            schedule_id: schedule.id,
            object_key: object_key.clone(),
            content_type: input.content_type,
            size: input.bytes.len() as i64,
            created_at: now,
        };
        self.submissions.create(&submission).await?;

        let token = sign_object_key(&object_key, &self.jwt_secret)?;
        let url = signed_url(&self.public_base_url, &object_key, &token);
        Ok(UploadSubmissionOutput { submission, url })
    }
}

// ── ListSubmissions ──────────────────────────────────────────────────────────

pub struct ListSubmissionsUseCase<S: SubmissionRepository> {
    pub submissions: S,
}

impl<S: SubmissionRepository> ListSubmissionsUseCase<S> {
    /// Students list their own files; admins may list any student's.
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        student_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Submission>, ApiError> {
        let target = student_id.unwrap_or(ctx.user_id);
        let resource = Resource::Submission {
            student_id: target,
            schedule_open: false,
        };
        if !can_access(ctx, &resource, Action::Read) {
            return Err(ApiError::Forbidden);
        }
        self.submissions.list_for_student(target, page).await
    }
}

// ── ServeFile (signed URL target) ────────────────────────────────────────────

pub struct ServeFileUseCase<S: SubmissionRepository, O: ObjectStorePort> {
    pub submissions: S,
    pub store: O,
    pub jwt_secret: String,
}

impl<S: SubmissionRepository, O: ObjectStorePort> ServeFileUseCase<S, O> {
    /// The signature is the whole authorization: no session is consulted, a
    /// valid unexpired token for exactly this key grants the bytes.
    pub async fn execute(&self, key: &str, token: &str) -> Result<(Vec<u8>, String), ApiError> {
        crate::infra::storage::verify_object_token(token, key, &self.jwt_secret)?;
        let submission = self
            .submissions
            .find_by_object_key(key)
            .await?
            .ok_or(ApiError::FileNotFound)?;
        let bytes = self.store.get(key).await?.ok_or(ApiError::FileNotFound)?;
        Ok((bytes, submission.content_type))
    }
}
