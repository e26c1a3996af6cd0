use chrono::Utc;
use uuid::Uuid;

use grading_domain::pagination::PageRequest;
use grading_domain::policy::{AccessContext, Action, Resource, can_access};
use grading_domain::role::Role;

use crate::domain::repository::{CourseRepository, ProfileRepository};
use crate::domain::types::Course;
use crate::error::ApiError;

/// Resolve the requester's link to a course: teacher assignment or student
/// enrollment. Admins count as linked everywhere.
pub(crate) async fn course_link<C: CourseRepository>(
    courses: &C,
    ctx: &AccessContext,
    course_id: Uuid,
) -> Result<bool, ApiError> {
    match ctx.role {
        Role::Admin => Ok(true),
        Role::Teacher => courses.is_teacher_assigned(course_id, ctx.user_id).await,
        Role::Student => courses.is_student_enrolled(course_id, ctx.user_id).await,
    }
}

// ── CreateCourse ─────────────────────────────────────────────────────────────

pub struct CreateCourseInput {
    pub name: String,
    pub description: Option<String>,
}

pub struct CreateCourseUseCase<C: CourseRepository> {
    pub courses: C,
}

impl<C: CourseRepository> CreateCourseUseCase<C> {
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        input: CreateCourseInput,
    ) -> Result<Course, ApiError> {
        // No link can exist before the course does: only admins pass.
        if !can_access(ctx, &Resource::Course { linked: false }, Action::Create) {
            return Err(ApiError::Forbidden);
        }
        if input.name.trim().is_empty() {
            return Err(ApiError::MissingData);
        }
        let now = Utc::now();
        let course = Course {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        self.courses.create(&course).await?;
        Ok(course)
    }
}

// ── GetCourse ────────────────────────────────────────────────────────────────

pub struct GetCourseUseCase<C: CourseRepository> {
    pub courses: C,
}

impl<C: CourseRepository> GetCourseUseCase<C> {
    pub async fn execute(&self, ctx: &AccessContext, id: Uuid) -> Result<Course, ApiError> {
        let course = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or(ApiError::CourseNotFound)?;
        let linked = course_link(&self.courses, ctx, id).await?;
        // Reads filtered out by ownership answer 404, not 403.
        if !can_access(ctx, &Resource::Course { linked }, Action::Read) {
            return Err(ApiError::CourseNotFound);
        }
        Ok(course)
    }
}

// ── ListCourses ──────────────────────────────────────────────────────────────

pub struct ListCoursesUseCase<C: CourseRepository> {
    pub courses: C,
}

impl<C: CourseRepository> ListCoursesUseCase<C> {
    /// Scoped at the query: admins see everything, teachers their
    /// assignments, students their enrollments.
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        page: PageRequest,
    ) -> Result<Vec<Course>, ApiError> {
        match ctx.role {
            Role::Admin => self.courses.list_all(page).await,
            Role::Teacher => self.courses.list_for_teacher(ctx.user_id, page).await,
            Role::Student => self.courses.list_for_student(ctx.user_id, page).await,
        }
    }
}

// ── UpdateCourse ─────────────────────────────────────────────────────────────

pub struct UpdateCourseInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct UpdateCourseUseCase<C: CourseRepository> {
    pub courses: C,
}

impl<C: CourseRepository> UpdateCourseUseCase<C> {
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        id: Uuid,
        input: UpdateCourseInput,
    ) -> Result<(), ApiError> {
        if input.name.is_none() && input.description.is_none() {
            return Err(ApiError::MissingData);
        }
        if self.courses.find_by_id(id).await?.is_none() {
            return Err(ApiError::CourseNotFound);
        }
        let linked = course_link(&self.courses, ctx, id).await?;
        if !can_access(ctx, &Resource::Course { linked }, Action::Update) {
            return Err(ApiError::Forbidden);
        }
        self.courses
            .update(id, input.name.as_deref(), input.description.as_deref())
            .await
    }
}

// ── DeleteCourse ─────────────────────────────────────────────────────────────

pub struct DeleteCourseUseCase<C: CourseRepository> {
    pub courses: C,
}

impl<C: CourseRepository> DeleteCourseUseCase<C> {
    pub async fn execute(&self, ctx: &AccessContext, id: Uuid) -> Result<(), ApiError> {
        let linked = course_link(&self.courses, ctx, id).await?;
        if !can_access(ctx, &Resource::Course { linked }, Action::Delete) {
            return Err(ApiError::Forbidden);
        }
        if !self.courses.delete(id).await? {
            return Err(ApiError::CourseNotFound);
        }
        Ok(())
    }
}

// ── Teacher/student links (admin only) ───────────────────────────────────────

pub struct AssignTeacherUseCase<C: CourseRepository, P: ProfileRepository> {
    pub courses: C,
    pub profiles: P,
}

impl<C: CourseRepository, P: ProfileRepository> AssignTeacherUseCase<C, P> {
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        course_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<(), ApiError> {
        if ctx.role != Role::Admin {
            return Err(ApiError::Forbidden);
        }
        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(ApiError::CourseNotFound);
        }
        let profile = self
            .profiles
            .find_by_id(teacher_id)
            .await?
            .ok_or(ApiError::ProfileNotFound)?;
        if profile.role != Role::Teacher {
            return Err(ApiError::RoleMismatch);
        }
        self.courses.assign_teacher(course_id, teacher_id).await
    }
}

pub struct UnassignTeacherUseCase<C: CourseRepository> {
    pub courses: C,
}

impl<C: CourseRepository> UnassignTeacherUseCase<C> {
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        course_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<(), ApiError> {
        if ctx.role != Role::Admin {
            return Err(ApiError::Forbidden);
        }
        if !self.courses.unassign_teacher(course_id, teacher_id).await? {
            return Err(ApiError::CourseNotFound);
        }
        Ok(())
    }
}

pub struct EnrollStudentUseCase<C: CourseRepository, P: ProfileRepository> {
    pub courses: C,
    pub profiles: P,
}

impl<C: CourseRepository, P: ProfileRepository> EnrollStudentUseCase<C, P> {
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<(), ApiError> {
        if ctx.role != Role::Admin {
            return Err(ApiError::Forbidden);
        }
        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(ApiError::CourseNotFound);
        }
        let profile = self
            .profiles
            .find_by_id(student_id)
            .await?
            .ok_or(ApiError::ProfileNotFound)?;
        if profile.role != Role::Student {
            return Err(ApiError::RoleMismatch);
        }
        self.courses.enroll_student(course_id, student_id).await
    }
}

pub struct UnenrollStudentUseCase<C: CourseRepository> {
    pub courses: C,
}

impl<C: CourseRepository> UnenrollStudentUseCase<C> {
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<(), ApiError> {
        if ctx.role != Role::Admin {
            return Err(ApiError::Forbidden);
        }
        if !self.courses.unenroll_student(course_id, student_id).await? {
            return Err(ApiError::CourseNotFound);
        }
        Ok(())
    }
}
