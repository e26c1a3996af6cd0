use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// API service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("admin role is not self-service")]
    AdminRoleReserved,
    #[error("identity not found")]
    IdentityNotFound,
    #[error("profile not found")]
    ProfileNotFound,
    #[error("course not found")]
    CourseNotFound,
    #[error("competency unit not found")]
    UnitNotFound,
    #[error("competency element not found")]
    ElementNotFound,
    #[error("evaluation schedule not found")]
    ScheduleNotFound,
    #[error("evaluation not found")]
    EvaluationNotFound,
    #[error("submission not found")]
    SubmissionNotFound,
    #[error("file not found")]
    FileNotFound,
    #[error("email already registered")]
    EmailTaken,
    #[error("evaluation already exists for student and unit")]
    EvaluationExists,
    #[error("invalid email")]
    InvalidEmail,
    #[error("missing data")]
    MissingData,
    #[error("invalid theme")]
    InvalidTheme,
    #[error("file exceeds maximum size")]
    FileTooLarge,
    #[error("unsupported file type")]
    UnsupportedFileType,
    #[error("invalid status transition")]
    InvalidStatusTransition,
    #[error("profile role does not fit the link")]
    RoleMismatch,
    #[error("invalid authcode")]
    InvalidAuthcode,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("too many authcodes")]
    TooManyAuthcodes,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::AdminRoleReserved => "ADMIN_ROLE_RESERVED",
            Self::IdentityNotFound => "IDENTITY_NOT_FOUND",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::UnitNotFound => "UNIT_NOT_FOUND",
            Self::ElementNotFound => "ELEMENT_NOT_FOUND",
            Self::ScheduleNotFound => "SCHEDULE_NOT_FOUND",
            Self::EvaluationNotFound => "EVALUATION_NOT_FOUND",
            Self::SubmissionNotFound => "SUBMISSION_NOT_FOUND",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::EvaluationExists => "EVALUATION_EXISTS",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidTheme => "INVALID_THEME",
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::RoleMismatch => "ROLE_MISMATCH",
            Self::InvalidAuthcode => "INVALID_AUTHCODE",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::TooManyAuthcodes => "TOO_MANY_AUTHCODES",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::AdminRoleReserved => StatusCode::FORBIDDEN,
            Self::IdentityNotFound
            | Self::ProfileNotFound
            | Self::CourseNotFound
            | Self::UnitNotFound
            | Self::ElementNotFound
            | Self::ScheduleNotFound
            | Self::EvaluationNotFound
            | Self::SubmissionNotFound
            | Self::FileNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken | Self::EvaluationExists => StatusCode::CONFLICT,
            Self::InvalidEmail
            | Self::MissingData
            | Self::InvalidTheme
            | Self::FileTooLarge
            | Self::UnsupportedFileType
            | Self::InvalidStatusTransition
            | Self::RoleMismatch => StatusCode::BAD_REQUEST,
            Self::InvalidAuthcode | Self::InvalidToken | Self::InvalidRefreshToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::TooManyAuthcodes => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
