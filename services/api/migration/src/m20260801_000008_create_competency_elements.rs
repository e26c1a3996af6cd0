use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompetencyElements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompetencyElements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompetencyElements::UnitId).uuid().not_null())
                    .col(ColumnDef::new(CompetencyElements::Title).string().not_null())
                    .col(
                        ColumnDef::new(CompetencyElements::MaxScore)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(CompetencyElements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CompetencyElements::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CompetencyElements::Table, CompetencyElements::UnitId)
                            .to(CompetencyUnits::Table, CompetencyUnits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(CompetencyElements::Table)
                    .col(CompetencyElements::UnitId)
                    .name("idx_competency_elements_unit_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompetencyElements::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CompetencyElements {
    Table,
    Id,
    UnitId,
    Title,
    MaxScore,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CompetencyUnits {
    Table,
    Id,
}
