//! Create partners table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Partner::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Partner::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Partner::Name).string().not_null())
                    .col(ColumnDef::new(Partner::ContactEmail).string())
                    .col(ColumnDef::new(Partner::Description).text())
                    .col(ColumnDef::new(Partner::Country).string())
                    .col(ColumnDef::new(Partner::ContractStartDate).date())
                    .col(ColumnDef::new(Partner::ContractEndDate).date())
                    .col(
                        ColumnDef::new(Partner::MeetingFrequency)
                            .string_len(20)
                            .not_null()
                            .default("none"),
                    )
                    .col(
                        ColumnDef::new(Partner::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partners_name")
                    .table(Partner::Table)
                    .col(Partner::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Partner::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Partner {
    #[sea_orm(iden = "partners")]
    Table,
    Id,
    Name,
    ContactEmail,
    Description,
    Country,
    ContractStartDate,
    ContractEndDate,
    MeetingFrequency,
    CreatedAt,
}
