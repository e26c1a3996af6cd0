use sea_orm::entity::prelude::*;

/// Submission window for a competency unit.
/// `status` wire values: 0 = open, 1 = closed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub status: i16,
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
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::competency_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetencyUnit.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
