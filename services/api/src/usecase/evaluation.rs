use anyhow::anyhow;
use chrono::Utc;
use uuid::Uuid;

use grading_domain::pagination::PageRequest;
use grading_domain::policy::{AccessContext, Action, Resource, can_access};
use grading_domain::role::Role;

use crate::domain::repository::{
    CompetencyUnitRepository, CourseRepository, EvaluationFilter, EvaluationRepository,
    SubmissionRepository,
};
use crate::domain::types::{Evaluation, EvaluationStatus};
use crate::error::ApiError;
use crate::usecase::course::course_link;

async fn evaluation_link<U: CompetencyUnitRepository, C: CourseRepository>(
    units: &U,
    courses: &C,
    ctx: &AccessContext,
    unit_id: Uuid,
) -> Result<bool, ApiError> {
    let unit = units
        .find_by_id(unit_id)
        .await?
        .ok_or_else(|| anyhow!("evaluation references missing unit {unit_id}"))?;
    course_link(courses, ctx, unit.course_id).await
}

// ── CreateEvaluation ─────────────────────────────────────────────────────────

pub struct CreateEvaluationInput {
    pub student_id: Uuid,
    pub unit_id: Uuid,
    pub score: Option<i32>,
    pub feedback: Option<String>,
}

pub struct CreateEvaluationUseCase<
    E: EvaluationRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
> {
    pub evaluations: E,
    pub units: U,
    pub courses: C,
}

impl<E: EvaluationRepository, U: CompetencyUnitRepository, C: CourseRepository>
    CreateEvaluationUseCase<E, U, C>
{
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        input: CreateEvaluationInput,
    ) -> Result<Evaluation, ApiError> {
        let unit = self
            .units
            .find_by_id(input.unit_id)
            .await?
            .ok_or(ApiError::UnitNotFound)?;
        let linked = course_link(&self.courses, ctx, unit.course_id).await?;
        let resource = Resource::Evaluation {
            teacher_id: ctx.user_id,
            student_id: input.student_id,
            linked,
        };
        if !can_access(ctx, &resource, Action::Create) {
            return Err(ApiError::Forbidden);
        }

        // Defensive probe; the unique index on (student_id, unit_id) is the
        // authoritative guard against racing creates.
        if self
            .evaluations
            .find_by_student_and_unit(input.student_id, input.unit_id)
            .await?
            .is_some()
        {
            return Err(ApiError::EvaluationExists);
        }

        let now = Utc::now();
        let evaluation = Evaluation {
            id: Uuid::now_v7(),
            student_id: input.student_id,
            teacher_id: ctx.user_id,
            unit_id: input.unit_id,
            submission_id: None,
            status: EvaluationStatus::Draft,
            score: input.score.unwrap_or(0),
            feedback: input.feedback,
            created_at: now,
            updated_at: now,
        };
        self.evaluations.create(&evaluation).await?;
        Ok(evaluation)
    }
}

// ── GetEvaluation ────────────────────────────────────────────────────────────

pub struct GetEvaluationUseCase<
    E: EvaluationRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
> {
    pub evaluations: E,
    pub units: U,
    pub courses: C,
}

impl<E: EvaluationRepository, U: CompetencyUnitRepository, C: CourseRepository>
    GetEvaluationUseCase<E, U, C>
{
    pub async fn execute(&self, ctx: &AccessContext, id: Uuid) -> Result<Evaluation, ApiError> {
        let evaluation = self
            .evaluations
            .find_by_id(id)
            .await?
            .ok_or(ApiError::EvaluationNotFound)?;
        let linked = evaluation_link(&self.units, &self.courses, ctx, evaluation.unit_id).await?;
        let resource = Resource::Evaluation {
            teacher_id: evaluation.teacher_id,
            student_id: evaluation.student_id,
            linked,
        };
        // Rows outside the caller's scope read as absent.
        if !can_access(ctx, &resource, Action::Read) {
            return Err(ApiError::EvaluationNotFound);
        }
        Ok(evaluation)
    }
}

// ── ListEvaluations ──────────────────────────────────────────────────────────

pub struct ListEvaluationsUseCase<E: EvaluationRepository> {
    pub evaluations: E,
}

impl<E: EvaluationRepository> ListEvaluationsUseCase<E> {
    /// Admins list with arbitrary filters; teachers and students are pinned
    /// to their own rows at the query level.
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        filter: EvaluationFilter,
        page: PageRequest,
    ) -> Result<Vec<Evaluation>, ApiError> {
        match ctx.role {
            Role::Admin => self.evaluations.list_all(filter, page).await,
            Role::Teacher => self.evaluations.list_for_teacher(ctx.user_id, page).await,
            Role::Student => self.evaluations.list_for_student(ctx.user_id, page).await,
        }
    }
}

// ── UpdateEvaluation ─────────────────────────────────────────────────────────

pub struct UpdateEvaluationInput {
    pub status: Option<EvaluationStatus>,
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub submission_id: Option<Uuid>,
}

pub struct UpdateEvaluationUseCase<
    E: EvaluationRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
    S: SubmissionRepository,
> {
    pub evaluations: E,
    pub units: U,
    pub courses: C,
    pub submissions: S,
}

impl<
    E: EvaluationRepository,
    U: CompetencyUnitRepository,
    C: CourseRepository,
    S: SubmissionRepository,
> UpdateEvaluationUseCase<E, U, C, S>
{
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        id: Uuid,
        input: UpdateEvaluationInput,
    ) -> Result<Evaluation, ApiError> {
        let mut evaluation = self
            .evaluations
            .find_by_id(id)
            .await?
            .ok_or(ApiError::EvaluationNotFound)?;
        let linked = evaluation_link(&self.units, &self.courses, ctx, evaluation.unit_id).await?;
        let resource = Resource::Evaluation {
            teacher_id: evaluation.teacher_id,
            student_id: evaluation.student_id,
            linked,
        };
        if !can_access(ctx, &resource, Action::Update) {
            return Err(ApiError::Forbidden);
        }

        // Confirmed evaluations are immutable.
        if evaluation.status == EvaluationStatus::Confirmed {
            return Err(ApiError::InvalidStatusTransition);
        }
        if let Some(next) = input.status {
            if !evaluation.status.can_transition_to(next) {
                return Err(ApiError::InvalidStatusTransition);
            }
            evaluation.status = next;
        }
        if let Some(submission_id) = input.submission_id {
            let submission = self
                .submissions
                .find_by_id(submission_id)
                .await?
                .ok_or(ApiError::SubmissionNotFound)?;
            if submission.student_id != evaluation.student_id {
                return Err(ApiError::RoleMismatch);
            }
            evaluation.submission_id = Some(submission_id);
        }
        if let Some(score) = input.score {
            evaluation.score = score;
        }
        if let Some(feedback) = input.feedback {
            evaluation.feedback = Some(feedback);
        }
        evaluation.updated_at = Utc::now();

        self.evaluations.update(&evaluation).await?;
        Ok(evaluation)
    }
}

// ── CheckEvaluation ──────────────────────────────────────────────────────────

pub struct CheckEvaluationUseCase<E: EvaluationRepository> {
    pub evaluations: E,
}

impl<E: EvaluationRepository> CheckEvaluationUseCase<E> {
    /// Defensive uniqueness probe used before creation. Students may only
    /// probe their own pair — the answer leaks evaluation existence.
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        student_id: Uuid,
        unit_id: Uuid,
    ) -> Result<bool, ApiError> {
        if ctx.role == Role::Student && student_id != ctx.user_id {
            return Err(ApiError::Forbidden);
        }
        Ok(self
            .evaluations
            .find_by_student_and_unit(student_id, unit_id)
            .await?
            .is_some())
    }
}
