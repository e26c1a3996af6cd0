use chrono::Utc;
use uuid::Uuid;

use grading_domain::pagination::PageRequest;
use grading_domain::policy::{AccessContext, Action, Resource, can_access};

use crate::domain::repository::{CompetencyUnitRepository, CourseRepository};
use crate::domain::types::CompetencyUnit;
use crate::error::ApiError;
use crate::usecase::course::course_link;

// ── CreateUnit ───────────────────────────────────────────────────────────────

pub struct CreateUnitInput {
    pub course_id: Uuid,
    pub code: String,
    pub title: String,
}

pub struct CreateUnitUseCase<U: CompetencyUnitRepository, C: CourseRepository> {
    pub units: U,
    pub courses: C,
}

impl<U: CompetencyUnitRepository, C: CourseRepository> CreateUnitUseCase<U, C> {
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        input: CreateUnitInput,
    ) -> Result<CompetencyUnit, ApiError> {
        if self.courses.find_by_id(input.course_id).await?.is_none() {
            return Err(ApiError::CourseNotFound);
        }
        let linked = course_link(&self.courses, ctx, input.course_id).await?;
        if !can_access(ctx, &Resource::CompetencyUnit { linked }, Action::Create) {
            return Err(ApiError::Forbidden);
        }
        if input.code.trim().is_empty() || input.title.trim().is_empty() {
            return Err(ApiError::MissingData);
        }
        let now = Utc::now();
        let unit = CompetencyUnit {
            id: Uuid::now_v7(),
            course_id: input.course_id,
            code: input.code,
            title: input.title,
            created_at: now,
            updated_at: now,
        };
        self.units.create(&unit).await?;
        Ok(unit)
    }
}

// ── GetUnit ──────────────────────────────────────────────────────────────────

pub struct GetUnitUseCase<U: CompetencyUnitRepository, C: CourseRepository> {
    pub units: U,
    pub courses: C,
}

impl<U: CompetencyUnitRepository, C: CourseRepository> GetUnitUseCase<U, C> {
    pub async fn execute(&self, ctx: &AccessContext, id: Uuid) -> Result<CompetencyUnit, ApiError> {
        let unit = self
            .units
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UnitNotFound)?;
        let linked = course_link(&self.courses, ctx, unit.course_id).await?;
        if !can_access(ctx, &Resource::CompetencyUnit { linked }, Action::Read) {
            return Err(ApiError::UnitNotFound);
        }
        Ok(unit)
    }
}

// ── ListUnits ────────────────────────────────────────────────────────────────

pub struct ListUnitsUseCase<U: CompetencyUnitRepository, C: CourseRepository> {
    pub units: U,
    pub courses: C,
}

impl<U: CompetencyUnitRepository, C: CourseRepository> ListUnitsUseCase<U, C> {
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        course_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<CompetencyUnit>, ApiError> {
        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(ApiError::CourseNotFound);
        }
        let linked = course_link(&self.courses, ctx, course_id).await?;
        if !can_access(ctx, &Resource::CompetencyUnit { linked }, Action::Read) {
            return Err(ApiError::CourseNotFound);
        }
        self.units.list_by_course(course_id, page).await
    }
}

// ── UpdateUnit ───────────────────────────────────────────────────────────────

pub struct UpdateUnitInput {
    pub code: Option<String>,
    pub title: Option<String>,
}

pub struct UpdateUnitUseCase<U: CompetencyUnitRepository, C: CourseRepository> {
    pub units: U,
    pub courses: C,
}

impl<U: CompetencyUnitRepository, C: CourseRepository> UpdateUnitUseCase<U, C> {
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        id: Uuid,
        input: UpdateUnitInput,
    ) -> Result<(), ApiError> {
        if input.code.is_none() && input.title.is_none() {
            return Err(ApiError::MissingData);
        }
        let unit = self
            .units
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UnitNotFound)?;
        let linked = course_link(&self.courses, ctx, unit.course_id).await?;
        if !can_access(ctx, &Resource::CompetencyUnit { linked }, Action::Update) {
            return Err(ApiError::Forbidden);
        }
        self.units
            .update(id, input.code.as_deref(), input.title.as_deref())
            .await
    }
}

// ── DeleteUnit ───────────────────────────────────────────────────────────────

pub struct DeleteUnitUseCase<U: CompetencyUnitRepository, C: CourseRepository> {
    pub units: U,
    pub courses: C,
}

impl<U: CompetencyUnitRepository, C: CourseRepository> DeleteUnitUseCase<U, C> {
    pub async fn execute(&self, ctx: &AccessContext, id: Uuid) -> Result<(), ApiError> {
        let unit = self
            .units
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UnitNotFound)?;
        let linked = course_link(&self.courses, ctx, unit.course_id).await?;
        if !can_access(ctx, &Resource::CompetencyUnit { linked }, Action::Delete) {
            return Err(ApiError::Forbidden);
        }
        self.units.delete(id).await?;
        Ok(())
    }
}
