//! Create events table.
//!
//! Only explicit events are stored; deadline and recurring meeting items
//! are derived on read.

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
                    .table(Event::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Event::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Event::PartnerId).integer())
                    .col(ColumnDef::new(Event::Title).string().not_null())
                    .col(ColumnDef::new(Event::Description).text())
                    .col(
                        ColumnDef::new(Event::EventDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Event::EventType)
                            .string_len(20)
                            .not_null()
                            .default("other"),
                    )
                    .col(
                        ColumnDef::new(Event::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_partner")
                            .from(Event::Table, Event::PartnerId)
                            .to(Partner::Table, Partner::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_event_date")
                    .table(Event::Table)
                    .col(Event::EventDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Event {
    #[sea_orm(iden = "events")]
    Table,
    Id,
    PartnerId,
    Title,
    Description,
    EventDate,
    EventType,
    CreatedAt,
}
