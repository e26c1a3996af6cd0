#![allow(async_fn_in_trait)]

use uuid::Uuid;

use grading_domain::pagination::PageRequest;

use crate::domain::types::{
    AuthCode, AuthCodeKind, CompetencyElement, CompetencyUnit, Course, Evaluation,
    EvaluationSchedule, Identity, Profile, ScheduleStatus, Submission, Theme,
};
use crate::error::ApiError;

/// Repository for authenticated identities.
pub trait IdentityRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, ApiError>;
    async fn create(&self, identity: &Identity) -> Result<(), ApiError>;
    /// Set `email_confirmed_at` once; later calls leave the original stamp.
    async fn confirm_email(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Repository for user profiles.
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, ApiError>;
    async fn list(&self, page: PageRequest) -> Result<Vec<Profile>, ApiError>;
    async fn create(&self, profile: &Profile) -> Result<(), ApiError>;
    async fn update_contact(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<(), ApiError>;
    /// Toggle the approval gate. Returns `false` when no profile row exists.
    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<bool, ApiError>;
}

/// Repository for one-time auth codes.
pub trait AuthCodeRepository: Send + Sync {
    async fn count_active(&self, identity_id: Uuid, kind: AuthCodeKind) -> Result<u64, ApiError>;
    async fn create(&self, code: &AuthCode) -> Result<(), ApiError>;
    async fn find_valid(
        &self,
        identity_id: Uuid,
        code: &str,
        kind: AuthCodeKind,
    ) -> Result<Option<AuthCode>, ApiError>;
    async fn mark_used(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Repository for courses and their teacher/student links.
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, ApiError>;
    async fn list_all(&self, page: PageRequest) -> Result<Vec<Course>, ApiError>;
    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Course>, ApiError>;
    async fn list_for_student(
        &self,
        student_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Course>, ApiError>;
    async fn create(&self, course: &Course) -> Result<(), ApiError>;
    async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), ApiError>;
    /// Returns `false` when no course row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    async fn assign_teacher(&self, course_id: Uuid, teacher_id: Uuid) -> Result<(), ApiError>;
    async fn unassign_teacher(&self, course_id: Uuid, teacher_id: Uuid) -> Result<bool, ApiError>;
    async fn enroll_student(&self, course_id: Uuid, student_id: Uuid) -> Result<(), ApiError>;
    async fn unenroll_student(&self, course_id: Uuid, student_id: Uuid) -> Result<bool, ApiError>;

    async fn is_teacher_assigned(&self, course_id: Uuid, teacher_id: Uuid)
    -> Result<bool, ApiError>;
    async fn is_student_enrolled(&self, course_id: Uuid, student_id: Uuid)
    -> Result<bool, ApiError>;
}

/// Repository for competency units.
pub trait CompetencyUnitRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CompetencyUnit>, ApiError>;
    async fn list_by_course(
        &self,
        course_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<CompetencyUnit>, ApiError>;
    async fn create(&self, unit: &CompetencyUnit) -> Result<(), ApiError>;
    async fn update(&self, id: Uuid, code: Option<&str>, title: Option<&str>)
    -> Result<(), ApiError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for competency elements.
pub trait CompetencyElementRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CompetencyElement>, ApiError>;
    async fn list_by_unit(
        &self,
        unit_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<CompetencyElement>, ApiError>;
    async fn create(&self, element: &CompetencyElement) -> Result<(), ApiError>;
    async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        max_score: Option<i32>,
    ) -> Result<(), ApiError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for evaluation schedules.
pub trait ScheduleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<EvaluationSchedule>, ApiError>;
    async fn list_by_unit(
        &self,
        unit_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<EvaluationSchedule>, ApiError>;
    async fn create(&self, schedule: &EvaluationSchedule) -> Result<(), ApiError>;
    async fn set_status(&self, id: Uuid, status: ScheduleStatus) -> Result<(), ApiError>;
}

/// Query filters for admin-scoped evaluation listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct EvaluationFilter {
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
}

/// Repository for evaluations.
///
/// List queries are ownership-scoped at the query level — rows outside the
/// caller's scope never leave the database.
pub trait EvaluationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Evaluation>, ApiError>;
    async fn find_by_student_and_unit(
        &self,
        student_id: Uuid,
        unit_id: Uuid,
    ) -> Result<Option<Evaluation>, ApiError>;
    async fn list_all(
        &self,
        filter: EvaluationFilter,
        page: PageRequest,
    ) -> Result<Vec<Evaluation>, ApiError>;
    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Evaluation>, ApiError>;
    async fn list_for_student(
        &self,
        student_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Evaluation>, ApiError>;
    async fn create(&self, evaluation: &Evaluation) -> Result<(), ApiError>;
    async fn update(&self, evaluation: &Evaluation) -> Result<(), ApiError>;
}

/// Repository for submissions.
pub trait SubmissionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, ApiError>;
    async fn find_by_object_key(&self, key: &str) -> Result<Option<Submission>, ApiError>;
    async fn list_for_student(
        &self,
        student_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Submission>, ApiError>;
    async fn create(&self, submission: &Submission) -> Result<(), ApiError>;
}

/// Repository for user preferences.
pub trait PreferenceRepository: Send + Sync {
    async fn get(&self, identity_id: Uuid) -> Result<Option<Theme>, ApiError>;
    async fn set(&self, identity_id: Uuid, theme: Theme) -> Result<(), ApiError>;
}

/// Port to the object store holding submission files.
pub trait ObjectStorePort: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), ApiError>;
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ApiError>;
}
