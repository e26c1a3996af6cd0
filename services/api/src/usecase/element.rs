use chrono::Utc;
use uuid::Uuid;

use grading_domain::pagination::PageRequest;
use grading_domain::policy::{AccessContext, Action, Resource, can_access};

use crate::domain::repository::{
    CompetencyElementRepository, CompetencyUnitRepository, CourseRepository,
};
use crate::domain::types::CompetencyElement;
use crate::error::ApiError;
use crate::usecase::course::course_link;

/// Resolve the course link transitively through the element's unit.
async fn unit_link<U: CompetencyUnitRepository, C: CourseRepository>(
    units: &U,
    courses: &C,
    ctx: &AccessContext,
    unit_id: Uuid,
) -> Result<Option<bool>, ApiError> {
    let Some(unit) = units.find_by_id(unit_id).await? else {
        return Ok(None);
    };
    Ok(Some(course_link(courses, ctx, unit.course_id).await?))
}

// ── CreateElement ────────────────────────────────────────────────────────────

pub struct CreateElementInput {
    pub unit_id: Uuid,
    pub title: String,
    pub max_score: i32,
}

pub struct CreateElementUseCase<
    E: CompetencyElementRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
> {
    pub elements: E,
    pub units: U,
    pub courses: C,
}

impl<E: CompetencyElementRepository, U: CompetencyUnitRepository, C: CourseRepository>
    CreateElementUseCase<E, U, C>
{
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        input: CreateElementInput,
    ) -> Result<CompetencyElement, ApiError> {
        let linked = unit_link(&self.units, &self.courses, ctx, input.unit_id)
            .await?
            .ok_or(ApiError::UnitNotFound)?;
        if !can_access(ctx, &Resource::CompetencyElement { linked }, Action::Create) {
            return Err(ApiError::Forbidden);
        }
        if input.title.trim().is_empty() || input.max_score <= 0 {
            return Err(ApiError::MissingData);
        }
        let now = Utc::now();
        let element = CompetencyElement {
            id: Uuid::now_v7(),
            unit_id: input.unit_id,
            title: input.title,
            max_score: input.max_score,
            created_at: now,
            updated_at: now,
        };
        self.elements.create(&element).await?;
        Ok(element)
    }
}

// ── GetElement ───────────────────────────────────────────────────────────────

pub struct GetElementUseCase<
    E: CompetencyElementRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
> {
    pub elements: E,
    pub units: U,
    pub courses: C,
}

impl<E: CompetencyElementRepository, U: CompetencyUnitRepository, C: CourseRepository>
    GetElementUseCase<E, U, C>
{
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        id: Uuid,
    ) -> Result<CompetencyElement, ApiError> {
        let element = self
            .elements
            .find_by_id(id)
            .await?
            .ok_or(ApiError::ElementNotFound)?;
        let linked = unit_link(&self.units, &self.courses, ctx, element.unit_id)
            .await?
            .ok_or(ApiError::ElementNotFound)?;
        if !can_access(ctx, &Resource::CompetencyElement { linked }, Action::Read) {
            return Err(ApiError::ElementNotFound);
        }
        Ok(element)
    }
}

// ── ListElements ─────────────────────────────────────────────────────────────

pub struct ListElementsUseCase<
    E: CompetencyElementRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
> {
    pub elements: E,
    pub units: U,
    pub courses: C,
}

impl<E: CompetencyElementRepository, U: CompetencyUnitRepository, C: CourseRepository>
    ListElementsUseCase<E, U, C>
{
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        unit_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<CompetencyElement>, ApiError> {
        let linked = unit_link(&self.units, &self.courses, ctx, unit_id)
            .await?
            .ok_or(ApiError::UnitNotFound)?;
        if !can_access(ctx, &Resource::CompetencyElement { linked }, Action::Read) {
            return Err(ApiError::UnitNotFound);
        }
        self.elements.list_by_unit(unit_id, page).await
    }
}

// ── UpdateElement ────────────────────────────────────────────────────────────

pub struct UpdateElementInput {
    pub title: Option<String>,
    pub max_score: Option<i32>,
}

pub struct UpdateElementUseCase<
    E: CompetencyElementRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
> {
    pub elements: E,
    pub units: U,
    pub courses: C,
}

impl<E: CompetencyElementRepository, U: CompetencyUnitRepository, C: CourseRepository>
    UpdateElementUseCase<E, U, C>
{
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        id: Uuid,
        input: UpdateElementInput,
    ) -> Result<(), ApiError> {
        if input.title.is_none() && input.max_score.is_none() {
            return Err(ApiError::MissingData);
        }
        if let Some(max_score) = input.max_score {
            if max_score <= 0 {
                return Err(ApiError::MissingData);
            }
        }
        let element = self
            .elements
            .find_by_id(id)
            .await?
            .ok_or(ApiError::ElementNotFound)?;
        let linked = unit_link(&self.units, &self.courses, ctx, element.unit_id)
            .await?
            .ok_or(ApiError::ElementNotFound)?;
        if !can_access(ctx, &Resource::CompetencyElement { linked }, Action::Update) {
            return Err(ApiError::Forbidden);
        }
        self.elements
            .update(id, input.title.as_deref(), input.max_score)
            .await
    }
}

// ── DeleteElement ────────────────────────────────────────────────────────────

pub struct DeleteElementUseCase<
    E: CompetencyElementRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
> {
    pub elements: E,
    pub units: U,
    pub courses: C,
}

impl<E: CompetencyElementRepository, U: CompetencyUnitRepository, C: CourseRepository>
    DeleteElementUseCase<E, U, C>
{
    pub async fn execute(&self, ctx: &AccessContext, id: Uuid) -> Result<(), ApiError> {
        let element = self
            .elements
            .find_by_id(id)
            .await?
            .ok_or(ApiError::ElementNotFound)?;
        let linked = unit_link(&self.units, &self.courses, ctx, element.unit_id)
            .await?
            .ok_or(ApiError::ElementNotFound)?;
        if !can_access(ctx, &Resource::CompetencyElement { linked }, Action::Delete) {
            return Err(ApiError::Forbidden);
        }
        self.elements.delete(id).await?;
        Ok(())
    }
}
