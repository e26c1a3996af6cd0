use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompetencyUnits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompetencyUnits::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompetencyUnits::CourseId).uuid().not_null())
                    .col(ColumnDef::new(CompetencyUnits::Code).string().not_null())
                    .col(ColumnDef::new(CompetencyUnits::Title).string().not_null())
                    .col(
                        ColumnDef::new(CompetencyUnits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CompetencyUnits::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CompetencyUnits::Table, CompetencyUnits::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(CompetencyUnits::Table)
                    .col(CompetencyUnits::CourseId)
                    .name("idx_competency_units_course_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompetencyUnits::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CompetencyUnits {
    Table,
    Id,
    CourseId,
    Code,
    Title,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
}
