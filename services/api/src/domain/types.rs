use chrono::{DateTime, Utc};
use grading_domain::policy::AccessContext;
use grading_domain::role::Role;
use grading_domain::route::GateFacts;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated principal row.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub email_confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application-level user record carrying role and approval status.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request-scoped principal: identity plus its profile row, if any.
///
/// Recomputed on every request — approval toggles and role changes take
/// effect immediately.
#[derive(Debug, Clone)]
pub struct Actor {
    pub identity: Identity,
    pub profile: Option<Profile>,
}

impl Actor {
    /// Gate facts for the route-guard state machine. A missing profile row
    /// reads as unapproved — the waiting-approval page hosts lazy creation.
    pub fn gate_facts(&self) -> GateFacts {
        GateFacts {
            email_confirmed: self.identity.email_confirmed_at.is_some(),
            approved: self.profile.as_ref().is_some_and(|p| p.approved),
        }
    }

    /// Policy context, available once a profile exists.
    pub fn access_context(&self) -> Option<AccessContext> {
        self.profile.as_ref().map(|p| AccessContext {
            user_id: p.id,
            role: p.role,
            approved: p.approved,
            email_confirmed: self.identity.email_confirmed_at.is_some(),
        })
    }
}

/// Purpose of a one-time auth code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthCodeKind {
    SignupConfirm = 0,
    Login = 1,
}

impl AuthCodeKind {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::SignupConfirm),
            1 => Some(Self::Login),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// One-time auth code for signup confirmation or passwordless login.
#[derive(Debug, Clone)]
pub struct AuthCode {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub code: String,
    pub kind: AuthCodeKind,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AuthCode {
    pub fn is_valid(&self) -> bool {
        self.used_at.is_none() && self.expires_at > Utc::now()
    }
}

/// Training program.
#[derive(Debug, Clone)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// NCS competency unit within a course.
#[derive(Debug, Clone)]
pub struct CompetencyUnit {
    pub id: Uuid,
    pub course_id: Uuid,
    pub code: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Gradeable element of a competency unit.
#[derive(Debug, Clone)]
pub struct CompetencyElement {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub max_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission window state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Open = 0,
    Closed = 1,
}

impl ScheduleStatus {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Open),
            1 => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// Submission window for a competency unit.
#[derive(Debug, Clone)]
pub struct EvaluationSchedule {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Evaluation lifecycle state. Transitions are forward-only:
/// draft → submitted → confirmed, and confirmed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Draft = 0,
    Submitted = 1,
    Confirmed = 2,
}

impl EvaluationStatus {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Draft),
            1 => Some(Self::Submitted),
            2 => Some(Self::Confirmed),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Draft)
                | (Self::Draft, Self::Submitted)
                | (Self::Submitted, Self::Submitted)
                | (Self::Submitted, Self::Confirmed)
        )
    }
}

/// Evaluation of one student on one competency unit by one teacher.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub unit_id: Uuid,
    pub submission_id: Option<Uuid>,
    pub status: EvaluationStatus,
    pub score: i32,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Uploaded evidence file reference.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub student_id: Uuid,
    pub schedule_id: Uuid,
    pub object_key: String,
    pub content_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

/// UI theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Minimal shape check for inbound email addresses.
pub fn validate_email(email: &str) -> bool {
    let trimmed = email.trim();
    !trimmed.is_empty() && trimmed.contains('@') && !trimmed.starts_with('@') && !trimmed.ends_with('@')
}

/// Maximum number of active (unused, unexpired) auth codes per identity.
pub const MAX_ACTIVE_AUTHCODES: u64 = 5;

/// Auth code length in characters.
pub const AUTHCODE_LEN: usize = 12;

/// Auth code time-to-live in seconds.
pub const AUTHCODE_TTL_SECS: i64 = 120;

/// Upload size cap: exactly 5 MiB is accepted, one byte more is rejected.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Signed file-URL lifetime in seconds (7 days).
pub const SIGNED_URL_TTL_SECS: u64 = 604800;
