use sea_orm::entity::prelude::*;

/// Gradeable element of a competency unit.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "competency_elements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub max_score: i32,
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
}

impl Related<super::competency_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetencyUnit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
