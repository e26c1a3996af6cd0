use sea_orm::entity::prelude::*;

/// Evaluation of one student on one competency unit by one teacher.
/// Unique on (student_id, unit_id). `status` wire values: 0 = draft,
/// 1 = submitted, 2 = confirmed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub unit_id: Uuid,
    #[sea_orm(unique)]
    pub submission_id: Option<Uuid>,
    pub status: i16,
    pub score: i32,
    pub feedback: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::competency_units::Entity",
        from = "Column::UnitId",
        to = "super::competency_units::Column::Id"
    )]
    CompetencyUnit,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::StudentId",
        to = "super::profiles::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::TeacherId",
        to = "super::profiles::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
}

impl Related<super::competency_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetencyUnit.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
