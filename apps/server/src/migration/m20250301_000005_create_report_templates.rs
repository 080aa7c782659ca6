//! Create report_templates table.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_partners::Partner;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReportTemplate::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReportTemplate::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReportTemplate::PartnerId).integer().not_null())
                    .col(ColumnDef::new(ReportTemplate::Title).string().not_null())
                    .col(ColumnDef::new(ReportTemplate::Instructions).text().not_null())
                    .col(ColumnDef::new(ReportTemplate::Structure).json().not_null())
                    .col(
                        ColumnDef::new(ReportTemplate::RequiresVideo)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ReportTemplate::RequiresAudio)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ReportTemplate::RequiresText)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ReportTemplate::TextFormats)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ReportTemplate::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_templates_partner")
                            .from(ReportTemplate::Table, ReportTemplate::PartnerId)
                            .to(Partner::Table, Partner::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_templates_partner_id")
                    .table(ReportTemplate::Table)
                    .col(ReportTemplate::PartnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReportTemplate::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ReportTemplate {
    #[sea_orm(iden = "report_templates")]
    Table,
    Id,
    PartnerId,
    Title,
    Instructions,
    Structure,
    RequiresVideo,
    RequiresAudio,
    RequiresText,
    TextFormats,
    CreatedAt,
}
