use chrono::Utc;
use uuid::Uuid;

use grading_domain::pagination::PageRequest;
use grading_domain::policy::{AccessContext, Action, Resource, can_access};

use crate::domain::repository::{CompetencyUnitRepository, CourseRepository, ScheduleRepository};
use crate::domain::types::{EvaluationSchedule, ScheduleStatus};
use crate::error::ApiError;
use crate::usecase::course::course_link;

// Schedules are administered as part of their competency unit, so policy
// checks go through the unit resource.

async fn link_for_unit<U: CompetencyUnitRepository, C: CourseRepository>(
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

// ── CreateSchedule ───────────────────────────────────────────────────────────

pub struct CreateScheduleInput {
    pub unit_id: Uuid,
    pub title: String,
}

pub struct CreateScheduleUseCase<
    S: ScheduleRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
> {
    pub schedules: S,
    pub units: U,
    pub courses: C,
}

impl<S: ScheduleRepository, U: CompetencyUnitRepository, C: CourseRepository>
    CreateScheduleUseCase<S, U, C>
{
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        input: CreateScheduleInput,
    ) -> Result<EvaluationSchedule, ApiError> {
        let linked = link_for_unit(&self.units, &self.courses, ctx, input.unit_id)
            .await?
            .ok_or(ApiError::UnitNotFound)?;
        if !can_access(ctx, &Resource::CompetencyUnit { linked }, Action::Create) {
            return Err(ApiError::Forbidden);
        }
        if input.title.trim().is_empty() {
            return Err(ApiError::MissingData);
        }
        let now = Utc::now();
        let schedule = EvaluationSchedule {
            id: Uuid::now_v7(),
            unit_id: input.unit_id,
            title: input.title,
            status: ScheduleStatus::Open,
            created_at: now,
            updated_at: now,
        };
        self.schedules.create(&schedule).await?;
        Ok(schedule)
    }
}

// ── ListSchedules ────────────────────────────────────────────────────────────

pub struct ListSchedulesUseCase<
    S: ScheduleRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
> {
    pub schedules: S,
    pub units: U,
    pub courses: C,
}

impl<S: ScheduleRepository, U: CompetencyUnitRepository, C: CourseRepository>
    ListSchedulesUseCase<S, U, C>
{
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        unit_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<EvaluationSchedule>, ApiError> {
        let linked = link_for_unit(&self.units, &self.courses, ctx, unit_id)
            .await?
            .ok_or(ApiError::UnitNotFound)?;
        if !can_access(ctx, &Resource::CompetencyUnit { linked }, Action::Read) {
            return Err(ApiError::UnitNotFound);
        }
        self.schedules.list_by_unit(unit_id, page).await
    }
}

// ── SetScheduleStatus ────────────────────────────────────────────────────────

pub struct SetScheduleStatusUseCase<
    S: ScheduleRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
> {
    pub schedules: S,
    pub units: U,
    pub courses: C,
}

impl<S: ScheduleRepository, U: CompetencyUnitRepository, C: CourseRepository>
    SetScheduleStatusUseCase<S, U, C>
{
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        id: Uuid,
        status: ScheduleStatus,
    ) -> Result<(), ApiError> {
        let schedule = self
            .schedules
            .find_by_id(id)
            .await?
            .ok_or(ApiError::ScheduleNotFound)?;
        let linked = link_for_unit(&self.units, &self.courses, ctx, schedule.unit_id)
            .await?
            .ok_or(ApiError::ScheduleNotFound)?;
        if !can_access(ctx, &Resource::CompetencyUnit { linked }, Action::Update) {
            return Err(ApiError::Forbidden);
        }
        self.schedules.set_status(id, status).await
    }
}
