use anyhow::{Context as _, anyhow};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::OnConflict,
};
use uuid::Uuid;

use grading_api_schema::{
    auth_codes, competency_elements, competency_units, course_students, course_teachers, courses,
    evaluation_schedules, evaluations, identities, preferences, profiles, submissions,
};
use grading_domain::pagination::PageRequest;
use grading_domain::role::Role;

use crate::domain::repository::{
    AuthCodeRepository, CompetencyElementRepository, CompetencyUnitRepository, CourseRepository,
    EvaluationFilter, EvaluationRepository, IdentityRepository, PreferenceRepository,
    ProfileRepository, ScheduleRepository, SubmissionRepository,
};
use crate::domain::types::{
    AuthCode, AuthCodeKind, CompetencyElement, CompetencyUnit, Course, Evaluation,
    EvaluationSchedule, EvaluationStatus, Identity, Profile, ScheduleStatus, Submission, Theme,
};
use crate::error::ApiError;

// ── Identity repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIdentityRepository {
    pub db: DatabaseConnection,
}

impl IdentityRepository for DbIdentityRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, ApiError> {
        let model = identities::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find identity by id")?;
        Ok(model.map(identity_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, ApiError> {
        let model = identities::Entity::find()
            .filter(identities::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find identity by email")?;
        Ok(model.map(identity_from_model))
    }

    async fn create(&self, identity: &Identity) -> Result<(), ApiError> {
        identities::ActiveModel {
            id: Set(identity.id),
            email: Set(identity.email.clone()),
            email_confirmed_at: Set(identity.email_confirmed_at),
            created_at: Set(identity.created_at),
            updated_at: Set(identity.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create identity")?;
        Ok(())
    }

    async fn confirm_email(&self, id: Uuid) -> Result<(), ApiError> {
        use sea_orm::sea_query::Expr;

        // Only stamp once; a second verify call leaves the original timestamp.
        identities::Entity::update_many()
            .filter(identities::Column::Id.eq(id))
            .filter(identities::Column::EmailConfirmedAt.is_null())
            .col_expr(
                identities::Column::EmailConfirmedAt,
                Expr::value(Some(Utc::now())),
            )
            .col_expr(identities::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("confirm identity email")?;
        Ok(())
    }
}

fn identity_from_model(model: identities::Model) -> Identity {
    Identity {
        id: model.id,
        email: model.email,
        email_confirmed_at: model.email_confirmed_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, ApiError> {
        let model = profiles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find profile by id")?;
        model.map(profile_from_model).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Profile>, ApiError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = profiles::Entity::find()
            .order_by_desc(profiles::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list profiles")?;
        models.into_iter().map(profile_from_model).collect()
    }

    async fn create(&self, profile: &Profile) -> Result<(), ApiError> {
        profiles::ActiveModel {
            id: Set(profile.id),
            email: Set(profile.email.clone()),
            full_name: Set(profile.full_name.clone()),
            phone: Set(profile.phone.clone()),
            role: Set(profile.role.as_u8() as i16),
            approved: Set(profile.approved),
            created_at: Set(profile.created_at),
            updated_at: Set(profile.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create profile")?;
        Ok(())
    }

    async fn update_contact(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut am = profiles::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(name) = full_name {
            am.full_name = Set(name.to_owned());
        }
        if let Some(phone) = phone {
            am.phone = Set(Some(phone.to_owned()));
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db)
            .await
            .context("update profile contact")?;
        Ok(())
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<bool, ApiError> {
        use sea_orm::sea_query::Expr;

        let result = profiles::Entity::update_many()
            .filter(profiles::Column::Id.eq(id))
            .col_expr(profiles::Column::Approved, Expr::value(approved))
            .col_expr(profiles::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("set profile approval")?;
        Ok(result.rows_affected > 0)
    }
}

fn profile_from_model(model: profiles::Model) -> Result<Profile, ApiError> {
    let role = Role::from_u8(model.role as u8)
        .ok_or_else(|| anyhow!("unknown role value {} on profile {}", model.role, model.id))?;
    Ok(Profile {
        id: model.id,
        email: model.email,
        full_name: model.full_name,
        phone: model.phone,
        role,
        approved: model.approved,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Auth code repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuthCodeRepository {
    pub db: DatabaseConnection,
}

impl AuthCodeRepository for DbAuthCodeRepository {
    async fn count_active(&self, identity_id: Uuid, kind: AuthCodeKind) -> Result<u64, ApiError> {
        let count = auth_codes::Entity::find()
            .filter(auth_codes::Column::IdentityId.eq(identity_id))
            .filter(auth_codes::Column::Kind.eq(kind.as_i16()))
            .filter(auth_codes::Column::UsedAt.is_null())
            .filter(auth_codes::Column::ExpiresAt.gt(Utc::now()))
            .count(&self.db)
            .await
            .context("count active auth codes")?;
        Ok(count)
    }

    async fn create(&self, code: &AuthCode) -> Result<(), ApiError> {
        auth_codes::ActiveModel {
            id: Set(code.id),
            identity_id: Set(code.identity_id),
            code: Set(code.code.clone()),
            kind: Set(code.kind.as_i16()),
            expires_at: Set(code.expires_at),
            used_at: Set(code.used_at),
            created_at: Set(code.created_at),
        }
        .insert(&self.db)
        .await
        .context("create auth code")?;
        Ok(())
    }

    async fn find_valid(
        &self,
        identity_id: Uuid,
        code: &str,
        kind: AuthCodeKind,
    ) -> Result<Option<AuthCode>, ApiError> {
        let model = auth_codes::Entity::find()
            .filter(auth_codes::Column::IdentityId.eq(identity_id))
            .filter(auth_codes::Column::Code.eq(code))
            .filter(auth_codes::Column::Kind.eq(kind.as_i16()))
            .filter(auth_codes::Column::UsedAt.is_null())
            .filter(auth_codes::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
            .context("find valid auth code")?;
        model.map(auth_code_from_model).transpose()
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), ApiError> {
        let am = auth_codes::ActiveModel {
            id: Set(id),
            used_at: Set(Some(Utc::now())),
            ..Default::default()
        };
        am.update(&self.db).await.context("mark auth code used")?;
        Ok(())
    }
}

fn auth_code_from_model(model: auth_codes::Model) -> Result<AuthCode, ApiError> {
    let kind = AuthCodeKind::from_i16(model.kind)
        .ok_or_else(|| anyhow!("unknown auth code kind {} on {}", model.kind, model.id))?;
    Ok(AuthCode {
        id: model.id,
        identity_id: model.identity_id,
        code: model.code,
        kind,
        expires_at: model.expires_at,
        used_at: model.used_at,
        created_at: model.created_at,
    })
}

// ── Course repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCourseRepository {
    pub db: DatabaseConnection,
}

impl CourseRepository for DbCourseRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, ApiError> {
        let model = courses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find course by id")?;
        Ok(model.map(course_from_model))
    }

    async fn list_all(&self, page: PageRequest) -> Result<Vec<Course>, ApiError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = courses::Entity::find()
            .order_by_desc(courses::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list courses")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Course>, ApiError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = courses::Entity::find()
            .inner_join(course_teachers::Entity)
            .filter(course_teachers::Column::TeacherId.eq(teacher_id))
            .order_by_desc(courses::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list courses for teacher")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Course>, ApiError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = courses::Entity::find()
            .inner_join(course_students::Entity)
            .filter(course_students::Column::StudentId.eq(student_id))
            .order_by_desc(courses::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list courses for student")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn create(&self, course: &Course) -> Result<(), ApiError> {
        courses::ActiveModel {
            id: Set(course.id),
            name: Set(course.name.clone()),
            description: Set(course.description.clone()),
            created_at: Set(course.created_at),
            updated_at: Set(course.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create course")?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut am = courses::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(name) = name {
            am.name = Set(name.to_owned());
        }
        if let Some(description) = description {
            am.description = Set(Some(description.to_owned()));
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await.context("update course")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = courses::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete course")?;
        Ok(result.rows_affected > 0)
    }

    async fn assign_teacher(&self, course_id: Uuid, teacher_id: Uuid) -> Result<(), ApiError> {
        let link = course_teachers::ActiveModel {
            course_id: Set(course_id),
            teacher_id: Set(teacher_id),
            created_at: Set(Utc::now()),
        };
        course_teachers::Entity::insert(link)
            .on_conflict(
                OnConflict::columns([
                    course_teachers::Column::CourseId,
                    course_teachers::Column::TeacherId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("assign teacher")?;
        Ok(())
    }

    async fn unassign_teacher(&self, course_id: Uuid, teacher_id: Uuid) -> Result<bool, ApiError> {
        let result = course_teachers::Entity::delete_many()
            .filter(course_teachers::Column::CourseId.eq(course_id))
            .filter(course_teachers::Column::TeacherId.eq(teacher_id))
            .exec(&self.db)
            .await
            .context("unassign teacher")?;
        Ok(result.rows_affected > 0)
    }

    async fn enroll_student(&self, course_id: Uuid, student_id: Uuid) -> Result<(), ApiError> {
        let link = course_students::ActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
            created_at: Set(Utc::now()),
        };
        course_students::Entity::insert(link)
            .on_conflict(
                OnConflict::columns([
                    course_students::Column::CourseId,
                    course_students::Column::StudentId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("enroll student")?;
        Ok(())
    }

    async fn unenroll_student(&self, course_id: Uuid, student_id: Uuid) -> Result<bool, ApiError> {
        let result = course_students::Entity::delete_many()
            .filter(course_students::Column::CourseId.eq(course_id))
            .filter(course_students::Column::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .context("unenroll student")?;
        Ok(result.rows_affected > 0)
    }

    async fn is_teacher_assigned(
        &self,
        course_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<bool, ApiError> {
        let model = course_teachers::Entity::find_by_id((course_id, teacher_id))
            .one(&self.db)
            .await
            .context("check teacher assignment")?;
        Ok(model.is_some())
    }

    async fn is_student_enrolled(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, ApiError> {
        let model = course_students::Entity::find_by_id((course_id, student_id))
            .one(&self.db)
            .await
            .context("check student enrollment")?;
        Ok(model.is_some())
    }
}

fn course_from_model(model: courses::Model) -> Course {
    Course {
        id: model.id,
        name: model.name,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Competency unit repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCompetencyUnitRepository {
    pub db: DatabaseConnection,
}

impl CompetencyUnitRepository for DbCompetencyUnitRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CompetencyUnit>, ApiError> {
        let model = competency_units::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find competency unit by id")?;
        Ok(model.map(unit_from_model))
    }

    async fn list_by_course(
        &self,
        course_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<CompetencyUnit>, ApiError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = competency_units::Entity::find()
            .filter(competency_units::Column::CourseId.eq(course_id))
            .order_by_asc(competency_units::Column::Code)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list competency units")?;
        Ok(models.into_iter().map(unit_from_model).collect())
    }

    async fn create(&self, unit: &CompetencyUnit) -> Result<(), ApiError> {
        competency_units::ActiveModel {
            id: Set(unit.id),
            course_id: Set(unit.course_id),
            code: Set(unit.code.clone()),
            title: Set(unit.title.clone()),
            created_at: Set(unit.created_at),
            updated_at: Set(unit.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create competency unit")?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        code: Option<&str>,
        title: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut am = competency_units::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(code) = code {
            am.code = Set(code.to_owned());
        }
        if let Some(title) = title {
            am.title = Set(title.to_owned());
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await.context("update competency unit")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = competency_units::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete competency unit")?;
        Ok(result.rows_affected > 0)
    }
}

fn unit_from_model(model: competency_units::Model) -> CompetencyUnit {
    CompetencyUnit {
        id: model.id,
        course_id: model.course_id,
        code: model.code,
        title: model.title,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Competency element repository ────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCompetencyElementRepository {
    pub db: DatabaseConnection,
}

impl CompetencyElementRepository for DbCompetencyElementRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CompetencyElement>, ApiError> {
        let model = competency_elements::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find competency element by id")?;
        Ok(model.map(element_from_model))
    }

    async fn list_by_unit(
        &self,
        unit_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<CompetencyElement>, ApiError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = competency_elements::Entity::find()
            .filter(competency_elements::Column::UnitId.eq(unit_id))
            .order_by_asc(competency_elements::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list competency elements")?;
        Ok(models.into_iter().map(element_from_model).collect())
    }

    async fn create(&self, element: &CompetencyElement) -> Result<(), ApiError> {
        competency_elements::ActiveModel {
            id: Set(element.id),
            unit_id: Set(element.unit_id),
            title: Set(element.title.clone()),
            max_score: Set(element.max_score),
            created_at: Set(element.created_at),
            updated_at: Set(element.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create competency element")?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        max_score: Option<i32>,
    ) -> Result<(), ApiError> {
        let mut am = competency_elements::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(title) = title {
            am.title = Set(title.to_owned());
        }
        if let Some(max_score) = max_score {
            am.max_score = Set(max_score);
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db)
            .await
            .context("update competency element")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = competency_elements::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete competency element")?;
        Ok(result.rows_affected > 0)
    }
}

fn element_from_model(model: competency_elements::Model) -> CompetencyElement {
    CompetencyElement {
        id: model.id,
        unit_id: model.unit_id,
        title: model.title,
        max_score: model.max_score,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Schedule repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbScheduleRepository {
    pub db: DatabaseConnection,
}

impl ScheduleRepository for DbScheduleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<EvaluationSchedule>, ApiError> {
        let model = evaluation_schedules::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find evaluation schedule by id")?;
        model.map(schedule_from_model).transpose()
    }

    async fn list_by_unit(
        &self,
        unit_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<EvaluationSchedule>, ApiError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = evaluation_schedules::Entity::find()
            .filter(evaluation_schedules::Column::UnitId.eq(unit_id))
            .order_by_desc(evaluation_schedules::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list evaluation schedules")?;
        models.into_iter().map(schedule_from_model).collect()
    }

    async fn create(&self, schedule: &EvaluationSchedule) -> Result<(), ApiError> {
        evaluation_schedules::ActiveModel {
            id: Set(schedule.id),
            unit_id: Set(schedule.unit_id),
            title: Set(schedule.title.clone()),
            status: Set(schedule.status.as_i16()),
            created_at: Set(schedule.created_at),
            updated_at: Set(schedule.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create evaluation schedule")?;
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: ScheduleStatus) -> Result<(), ApiError> {
        let am = evaluation_schedules::ActiveModel {
            id: Set(id),
            status: Set(status.as_i16()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        am.update(&self.db)
            .await
            .context("set evaluation schedule status")?;
        Ok(())
    }
}

fn schedule_from_model(model: evaluation_schedules::Model) -> Result<EvaluationSchedule, ApiError> {
    let status = ScheduleStatus::from_i16(model.status).ok_or_else(|| {
        anyhow!("unknown schedule status {} on {}", model.status, model.id)
    })?;
    Ok(EvaluationSchedule {
        id: model.id,
        unit_id: model.unit_id,
        title: model.title,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Evaluation repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEvaluationRepository {
    pub db: DatabaseConnection,
}

impl EvaluationRepository for DbEvaluationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Evaluation>, ApiError> {
        let model = evaluations::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find evaluation by id")?;
        model.map(evaluation_from_model).transpose()
    }

    async fn find_by_student_and_unit(
        &self,
        student_id: Uuid,
        unit_id: Uuid,
    ) -> Result<Option<Evaluation>, ApiError> {
        let model = evaluations::Entity::find()
            .filter(evaluations::Column::StudentId.eq(student_id))
            .filter(evaluations::Column::UnitId.eq(unit_id))
            .one(&self.db)
            .await
            .context("find evaluation by student and unit")?;
        model.map(evaluation_from_model).transpose()
    }

    async fn list_all(
        &self,
        filter: EvaluationFilter,
        page: PageRequest,
    ) -> Result<Vec<Evaluation>, ApiError> {
        let PageRequest { per_page, page } = page.clamped();
        let mut query = evaluations::Entity::find();
        if let Some(student_id) = filter.student_id {
            query = query.filter(evaluations::Column::StudentId.eq(student_id));
        }
        if let Some(teacher_id) = filter.teacher_id {
            query = query.filter(evaluations::Column::TeacherId.eq(teacher_id));
        }
        if let Some(unit_id) = filter.unit_id {
            query = query.filter(evaluations::Column::UnitId.eq(unit_id));
        }
        let models = query
            .order_by_desc(evaluations::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list evaluations")?;
        models.into_iter().map(evaluation_from_model).collect()
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
        evaluations::ActiveModel {
            id: Set(evaluation.id),
            student_id: Set(evaluation.student_id),
            teacher_id: Set(evaluation.teacher_id),
            unit_id: Set(evaluation.unit_id),
            submission_id: Set(evaluation.submission_id),
            status: Set(evaluation.status.as_i16()),
            score: Set(evaluation.score),
            feedback: Set(evaluation.feedback.clone()),
            created_at: Set(evaluation.created_at),
            updated_at: Set(evaluation.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create evaluation")?;
        Ok(())
    }

    async fn update(&self, evaluation: &Evaluation) -> Result<(), ApiError> {
        let am = evaluations::ActiveModel {
            id: Set(evaluation.id),
            submission_id: Set(evaluation.submission_id),
            status: Set(evaluation.status.as_i16()),
            score: Set(evaluation.score),
            feedback: Set(evaluation.feedback.clone()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        am.update(&self.db).await.context("update evaluation")?;
        Ok(())
    }
}

fn evaluation_from_model(model: evaluations::Model) -> Result<Evaluation, ApiError> {
    let status = EvaluationStatus::from_i16(model.status).ok_or_else(|| {
        anyhow!("unknown evaluation status {} on {}", model.status, model.id)
    })?;
    Ok(Evaluation {
        id: model.id,
        student_id: model.student_id,
        teacher_id: model.teacher_id,
        unit_id: model.unit_id,
        submission_id: model.submission_id,
        status,
        score: model.score,
        feedback: model.feedback,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Submission repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubmissionRepository {
    pub db: DatabaseConnection,
}

impl SubmissionRepository for DbSubmissionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, ApiError> {
        let model = submissions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find submission by id")?;
        Ok(model.map(submission_from_model))
    }

    async fn find_by_object_key(&self, key: &str) -> Result<Option<Submission>, ApiError> {
        let model = submissions::Entity::find()
            .filter(submissions::Column::ObjectKey.eq(key))
            .one(&self.db)
            .await
            .context("find submission by object key")?;
        Ok(model.map(submission_from_model))
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Submission>, ApiError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = submissions::Entity::find()
            .filter(submissions::Column::StudentId.eq(student_id))
            .order_by_desc(submissions::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list submissions for student")?;
        Ok(models.into_iter().map(submission_from_model).collect())
    }

    async fn create(&self, submission: &Submission) -> Result<(), ApiError> {
        submissions::ActiveModel {
            id: Set(submission.id),
            student_id: Set(submission.student_id),
            schedule_id: Set(submission.schedule_id),
            object_key: Set(submission.object_key.clone()),
            content_type: Set(submission.content_type.clone()),
            size: Set(submission.size),
            created_at: Set(submission.created_at),
        }
        .insert(&self.db)
        .await
        .context("create submission")?;
        Ok(())
    }
}

fn submission_from_model(model: submissions::Model) -> Submission {
    Submission {
        id: model.id,
        student_id: model.student_id,
        schedule_id: model.schedule_id,
        object_key: model.object_key,
        content_type: model.content_type,
        size: model.size,
        created_at: model.created_at,
    }
}

// ── Preference repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPreferenceRepository {
    pub db: DatabaseConnection,
}

impl PreferenceRepository for DbPreferenceRepository {
    async fn get(&self, identity_id: Uuid) -> Result<Option<Theme>, ApiError> {
        let model = preferences::Entity::find_by_id(identity_id)
            .one(&self.db)
            .await
            .context("get preference")?;
        match model {
            None => Ok(None),
            Some(row) => {
                let theme = Theme::parse(&row.theme).ok_or_else(|| {
                    anyhow!("unknown theme {:?} on {}", row.theme, row.identity_id)
                })?;
                Ok(Some(theme))
            }
        }
    }

    async fn set(&self, identity_id: Uuid, theme: Theme) -> Result<(), ApiError> {
        let preference = preferences::ActiveModel {
            identity_id: Set(identity_id),
            theme: Set(theme.as_str().to_owned()),
            updated_at: Set(Utc::now()),
        };
        preferences::Entity::insert(preference)
            .on_conflict(
                OnConflict::column(preferences::Column::IdentityId)
                    .update_columns([preferences::Column::Theme, preferences::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("set preference")?;
        Ok(())
    }
}
