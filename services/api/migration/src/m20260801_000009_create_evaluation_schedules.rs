use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EvaluationSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationSchedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationSchedules::UnitId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationSchedules::Title)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationSchedules::Status)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EvaluationSchedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(EvaluationSchedules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationSchedules::Table, EvaluationSchedules::UnitId)
                            .to(CompetencyUnits::Table, CompetencyUnits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EvaluationSchedules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EvaluationSchedules {
    Table,
    Id,
    UnitId,
    Title,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CompetencyUnits {
    Table,
    Id,
}
