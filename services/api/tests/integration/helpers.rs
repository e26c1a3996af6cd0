use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use grading_api::domain::repository::{
    AuthCodeRepository, CompetencyUnitRepository, CourseRepository, EvaluationFilter,
    EvaluationRepository, IdentityRepository, ObjectStorePort, ProfileRepository,
    ScheduleRepository, SubmissionRepository,
};
use grading_api::domain::types::{
    AuthCode, AuthCodeKind, CompetencyUnit, Course, Evaluation, EvaluationSchedule, Identity,
    Profile, ScheduleStatus, Submission,
};
use grading_api::error::ApiError;
use grading_domain::pagination::PageRequest;
use grading_domain::policy::AccessContext;
use grading_domain::role::Role;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

// ── Fixture ids ──────────────────────────────────────────────────────────────

pub fn admin_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-00000000000a").unwrap()
}

pub fn teacher_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-00000000000b").unwrap()
}

pub fn other_teacher_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-00000000000c").unwrap()
}

pub fn student_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-00000000000d").unwrap()
}

pub fn course_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-000000000101").unwrap()
}

pub fn unit_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-000000000201").unwrap()
}

pub fn schedule_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-000000000301").unwrap()
}

// ── Fixture rows ─────────────────────────────────────────────────────────────

pub fn test_identity(id: Uuid, email: &str, confirmed: bool) -> Identity {
    Identity {
        id,
        email: email.to_owned(),
        email_confirmed_at: confirmed.then(Utc::now),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_profile(id: Uuid, role: Role, approved: bool) -> Profile {
    Profile {
        id,
        email: format!("{id}@example.com"),
        full_name: "Test User".to_owned(),
        phone: None,
        role,
        approved,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_auth_code(identity_id: Uuid, kind: AuthCodeKind) -> AuthCode {
    AuthCode {
        id: Uuid::new_v4(),
        identity_id,
        code: "ABCDEF123456".to_owned(),
        kind,
        expires_at: Utc::now() + chrono::Duration::seconds(120),
        used_at: None,
        created_at: Utc::now(),
    }
}

pub fn test_course() -> Course {
    Course {
        id: course_id(),
        name: "Web Development".to_owned(),
        description: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_unit() -> CompetencyUnit {
    CompetencyUnit {
        id: unit_id(),
        course_id: course_id(),
        code: "2001020107_17v3".to_owned(),
        title: "Backend Implementation".to_owned(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_schedule(status: ScheduleStatus) -> EvaluationSchedule {
    EvaluationSchedule {
        id: schedule_id(),
        unit_id: unit_id(),
        title: "Week 4 evidence".to_owned(),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Gated policy context for an active (confirmed + approved) user.
pub fn active_ctx(user_id: Uuid, role: Role) -> AccessContext {
    AccessContext {
        user_id,
        role,
        approved: true,
        email_confirmed: true,
    }
}

// ── MockIdentityRepo ─────────────────────────────────────────────────────────

pub struct MockIdentityRepo {
    pub identities: Arc<Mutex<Vec<Identity>>>,
    pub fail: bool,
}

impl MockIdentityRepo {
    pub fn new(identities: Vec<Identity>) -> Self {
        Self {
            identities: Arc::new(Mutex::new(identities)),
            fail: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn failing() -> Self {
        Self {
            identities: Arc::new(Mutex::new(vec![])),
            fail: true,
        }
    }

    fn guard(&self) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::Internal(anyhow::anyhow!("identity repo down")));
        }
        Ok(())
    }
}

impl IdentityRepository for MockIdentityRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, ApiError> {
        self.guard()?;
        Ok(self
            .identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, ApiError> {
        self.guard()?;
        Ok(self
            .identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.email == email)
            .cloned())
    }

    async fn create(&self, identity: &Identity) -> Result<(), ApiError> {
        self.guard()?;
        self.identities.lock().unwrap().push(identity.clone());
        Ok(())
    }

    async fn confirm_email(&self, id: Uuid) -> Result<(), ApiError> {
        self.guard()?;
        let mut identities = self.identities.lock().unwrap();
        if let Some(identity) = identities.iter_mut().find(|i| i.id == id) {
            if identity.email_confirmed_at.is_none() {
                identity.email_confirmed_at = Some(Utc::now());
            }
        }
        Ok(())
    }
}

// ── MockProfileRepo ──────────────────────────────────────────────────────────

pub struct MockProfileRepo {
    pub profiles: Arc<Mutex<Vec<Profile>>>,
    pub fail: bool,
}

impl MockProfileRepo {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Arc::new(Mutex::new(profiles)),
            fail: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn failing() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(vec![])),
            fail: true,
        }
    }

    pub fn profiles_handle(&self) -> Arc<Mutex<Vec<Profile>>> {
        Arc::clone(&self.profiles)
    }

    fn guard(&self) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::Internal(anyhow::anyhow!("profile repo down")));
        }
        Ok(())
    }
}

impl ProfileRepository for MockProfileRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, ApiError> {
        self.guard()?;
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list(&self, _page: PageRequest) -> Result<Vec<Profile>, ApiError> {
        self.guard()?;
        Ok(self.profiles.lock().unwrap().clone())
    }

    async fn create(&self, profile: &Profile) -> Result<(), ApiError> {
        self.guard()?;
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(())
    }

    async fn update_contact(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<(), ApiError> {
        self.guard()?;
        let mut profiles = self.profiles.lock().unwrap();
        if let Some(profile) = profiles.iter_mut().find(|p| p.id == id) {
            if let Some(full_name) = full_name {
                profile.full_name = full_name.to_owned();
            }
            if let Some(phone) = phone {
                profile.phone = Some(phone.to_owned());
            }
        }
        Ok(())
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<bool, ApiError> {
        self.guard()?;
        let mut profiles = self.profiles.lock().unwrap();
        match profiles.iter_mut().find(|p| p.id == id) {
            Some(profile) => {
                profile.approved = approved;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockAuthCodeRepo ─────────────────────────────────────────────────────────

pub struct MockAuthCodeRepo {
    pub codes: Arc<Mutex<Vec<AuthCode>>>,
    pub active_count: u64,
}

impl MockAuthCodeRepo {
    pub fn new(codes: Vec<AuthCode>, active_count: u64) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
            active_count,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![], 0)
    }

    pub fn codes_handle(&self) -> Arc<Mutex<Vec<AuthCode>>> {
        Arc::clone(&self.codes)
    }
}

impl AuthCodeRepository for MockAuthCodeRepo {
    async fn count_active(&self, _identity_id: Uuid, _kind: AuthCodeKind) -> Result<u64, ApiError> {
        Ok(self.active_count)
    }

    async fn create(&self, code: &AuthCode) -> Result<(), ApiError> {
        self.codes.lock().unwrap().push(code.clone());
        Ok(())
    }

    async fn find_valid(
        &self,
        identity_id: Uuid,
        code: &str,
        kind: AuthCodeKind,
    ) -> Result<Option<AuthCode>, ApiError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.identity_id == identity_id && c.code == code && c.kind == kind && c.is_valid())
            .cloned())
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), ApiError> {
        let mut codes = self.codes.lock().unwrap();
        if let Some(code) = codes.iter_mut().find(|c| c.id == id) {
            code.used_at = Some(Utc::now());
        }
        Ok(())
    }
}

// ── MockCourseRepo ───────────────────────────────────────────────────────────

pub struct MockCourseRepo {
    pub courses: Vec<Course>,
    pub teacher_links: Vec<(Uuid, Uuid)>,
    pub student_links: Vec<(Uuid, Uuid)>,
}

impl MockCourseRepo {
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            courses,
            teacher_links: vec![],
            student_links: vec![],
        }
    }

    pub fn with_teacher(mut self, course_id: Uuid, teacher_id: Uuid) -> Self {
        self.teacher_links.push((course_id, teacher_id));
        self
    }

    pub fn with_student(mut self, course_id: Uuid, student_id: Uuid) -> Self {
        self.student_links.push((course_id, student_id));
        self
    }
}

impl CourseRepository for MockCourseRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, ApiError> {
        Ok(self.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn list_all(&self, _page: PageRequest) -> Result<Vec<Course>, ApiError> {
        Ok(self.courses.clone())
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<Course>, ApiError> {
        Ok(self
            .courses
            .iter()
            .filter(|c| self.teacher_links.contains(&(c.id, teacher_id)))
            .cloned()
            .collect())
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<Course>, ApiError> {
        Ok(self
            .courses
            .iter()
            .filter(|c| self.student_links.contains(&(c.id, student_id)))
            .cloned()
            .collect())
    }

    async fn create(&self, _course: &Course) -> Result<(), ApiError> {
        Ok(())
    }

    async fn update(
        &self,
        _id: Uuid,
        _name: Option<&str>,
        _description: Option<&str>,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.courses.iter().any(|c| c.id == id))
    }

    async fn assign_teacher(&self, _course_id: Uuid, _teacher_id: Uuid) -> Result<(), ApiError> {
        Ok(())
    }

    async fn unassign_teacher(&self, course_id: Uuid, teacher_id: Uuid) -> Result<bool, ApiError> {
        Ok(self.teacher_links.contains(&(course_id, teacher_id)))
    }

    async fn enroll_student(&self, _course_id: Uuid, _student_id: Uuid) -> Result<(), ApiError> {
        Ok(())
    }

    async fn unenroll_student(&self, course_id: Uuid, student_id: Uuid) -> Result<bool, ApiError> {
        Ok(self.student_links.contains(&(course_id, student_id)))
    }

    async fn is_teacher_assigned(
        &self,
        course_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<bool, ApiError> {
        Ok(self.teacher_links.contains(&(course_id, teacher_id)))
    }

    async fn is_student_enrolled(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, ApiError> {
        Ok(self.student_links.contains(&(course_id, student_id)))
    }
}

// ── MockUnitRepo ─────────────────────────────────────────────────────────────

pub struct MockUnitRepo {
    pub units: Vec<CompetencyUnit>,
}

impl MockUnitRepo {
    pub fn new(units: Vec<CompetencyUnit>) -> Self {
        Self { units }
    }
}

impl CompetencyUnitRepository for MockUnitRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CompetencyUnit>, ApiError> {
        Ok(self.units.iter().find(|u| u.id == id).cloned())
    }

    async fn list_by_course(
        &self,
        course_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<CompetencyUnit>, ApiError> {
        Ok(self
            .units
            .iter()
            .filter(|u| u.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn create(&self, _unit: &CompetencyUnit) -> Result<(), ApiError> {
        Ok(())
    }

    async fn update(
        &self,
        _id: Uuid,
        _code: Option<&str>,
        _title: Option<&str>,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.units.iter().any(|u| u.id == id))
    }
}

// ── MockScheduleRepo ─────────────────────────────────────────────────────────

pub struct MockScheduleRepo {
    pub schedules: Vec<EvaluationSchedule>,
}

impl MockScheduleRepo {
    pub fn new(schedules: Vec<EvaluationSchedule>) -> Self {
        Self { schedules }
    }
}

impl ScheduleRepository for MockScheduleRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<EvaluationSchedule>, ApiError> {
        Ok(self.schedules.iter().find(|s| s.id == id).cloned())
    }

    async fn list_by_unit(
        &self,
        unit_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<EvaluationSchedule>, ApiError> {
        Ok(self
            .schedules
            .iter()
            .filter(|s| s.unit_id == unit_id)
            .cloned()
            .collect())
    }

    async fn create(&self, _schedule: &EvaluationSchedule) -> Result<(), ApiError> {
        Ok(())
    }

    async fn set_status(&self, _id: Uuid, _status: ScheduleStatus) -> Result<(), ApiError> {
        Ok(())
    }
}

// ── MockEvaluationRepo ───────────────────────────────────────────────────────

pub struct MockEvaluationRepo {
    pub evaluations: Arc<Mutex<Vec<Evaluation>>>,
}

impl MockEvaluationRepo {
    pub fn new(evaluations: Vec<Evaluation>) -> Self {
        Self {
            evaluations: Arc::new(Mutex::new(evaluations)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn evaluations_handle(&self) -> Arc<Mutex<Vec<Evaluation>>> {
        Arc::clone(&self.evaluations)
    }
}

impl EvaluationRepository for MockEvaluationRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Evaluation>, ApiError> {
        Ok(self
            .evaluations
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_by_student_and_unit(
        &self,
        student_id: Uuid,
        unit_id: Uuid,
    ) -> Result<Option<Evaluation>, ApiError> {
        Ok(self
            .evaluations
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.student_id == student_id && e.unit_id == unit_id)
            .cloned())
    }

    async fn list_all(
        &self,
        filter: EvaluationFilter,
        _page: PageRequest,
    ) -> Result<Vec<Evaluation>, ApiError> {
        Ok(self
            .evaluations
            .lock()
            .unwrap()
            .iter()
            .filter(|e| filter.student_id.is_none_or(|id| e.student_id == id))
            .filter(|e| filter.teacher_id.is_none_or(|id| e.teacher_id == id))
            .filter(|e| filter.unit_id.is_none_or(|id| e.unit_id == id))
            .cloned()
            .collect())
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Evaluation>, ApiError> {
        self.list_all(
            EvaluationFilter {
                teacher_id: Some(teacher_id),
                ..Default::default()
            },
            page,
        )
        .await
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Evaluation>, ApiError> {
        self.list_all(
            EvaluationFilter {
                student_id: Some(student_id),
                ..Default::default()
            },
            page,
        )
        .await
    }

    async fn create(&self, evaluation: &Evaluation) -> Result<(), ApiError> {
        self.evaluations.lock().unwrap().push(evaluation.clone());
        Ok(())
    }

    async fn update(&self, evaluation: &Evaluation) -> Result<(), ApiError> {
        let mut evaluations = self.evaluations.lock().unwrap();
        if let Some(existing) = evaluations.iter_mut().find(|e| e.id == evaluation.id) {
            *existing = evaluation.clone();
        }
        Ok(())
    }
}

// ── MockSubmissionRepo ───────────────────────────────────────────────────────

pub struct MockSubmissionRepo {
    pub submissions: Arc<Mutex<Vec<Submission>>>,
}

impl MockSubmissionRepo {
    pub fn new(submissions: Vec<Submission>) -> Self {
        Self {
            submissions: Arc::new(Mutex::new(submissions)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn submissions_handle(&self) -> Arc<Mutex<Vec<Submission>>> {
        Arc::clone(&self.submissions)
    }
}

impl SubmissionRepository for MockSubmissionRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, ApiError> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_by_object_key(&self, key: &str) -> Result<Option<Submission>, ApiError> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.object_key == key)
            .cloned())
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<Submission>, ApiError> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn create(&self, submission: &Submission) -> Result<(), ApiError> {
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

// ── MemoryObjectStore ────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    pub objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStorePort for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), ApiError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ApiError> {
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }
}
