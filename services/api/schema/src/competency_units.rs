use sea_orm::entity::prelude::*;

/// NCS competency unit within a course.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "competency_units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    /// NCS classification code, e.g. "2001020107_17v3".
    pub code: String,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::competency_elements::Entity")]
    CompetencyElements,
    #[sea_orm(has_many = "super::evaluation_schedules::Entity")]
    EvaluationSchedules,
    #[sea_orm(has_many = "super::evaluations::Entity")]
    Evaluations,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::competency_elements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetencyElements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
