//! SeaORM database migrations.
//!
//! Built with the schema builder so the same migrations run on PostgreSQL
//! and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_partners;
mod m20250301_000002_create_projects;
mod m20250301_000003_create_reports;
mod m20250301_000004_create_events;
mod m20250301_000005_create_report_templates;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_partners::Migration),
            Box::new(m20250301_000002_create_projects::Migration),
            Box::new(m20250301_000003_create_reports::Migration),
            Box::new(m20250301_000004_create_events::Migration),
            Box::new(m20250301_000005_create_report_templates::Migration),
        ]
    }
}
