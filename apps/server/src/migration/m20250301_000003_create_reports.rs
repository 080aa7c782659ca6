//! Create reports table.

use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_projects::Project;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Report::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Report::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Report::Title).string().not_null())
                    .col(ColumnDef::new(Report::Deadline).date())
                    .col(ColumnDef::new(Report::SubmissionDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Report::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Report::FilePath).string())
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_project")
                            .from(Report::Table, Report::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_project_id")
                    .table(Report::Table)
                    .col(Report::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_deadline")
                    .table(Report::Table)
                    .col(Report::Deadline)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Report {
    #[sea_orm(iden = "reports")]
    Table,
    Id,
    ProjectId,
    Title,
    Deadline,
    SubmissionDate,
    Status,
    FilePath,
    CreatedAt,
}
