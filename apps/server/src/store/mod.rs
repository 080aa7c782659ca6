//! Repository interface over the portal's persistent state.
//!
//! Two implementations exist: [`DbPool`](crate::db::DbPool) backed by SeaORM
//! and [`MemoryStore`] holding the demonstration dataset. One of them is
//! chosen at startup by [`select_store`] and shared as `Arc<dyn PortalStore>`.

mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, DatabaseEngine};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    CreateEventRequest, CreatePartnerRequest, CreateProjectRequest, CreateTemplateRequest, Event,
    EvolutionPoint, NewReport, Partner, PartnerFilter, Project, Report, ReportFilter,
    ReportTemplate,
};

pub use memory::MemoryStore;

#[async_trait]
pub trait PortalStore: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// True when serving the in-memory demonstration dataset.
    fn is_mock(&self) -> bool {
        false
    }

    async fn ping(&self) -> AppResult<()>;

    /// Partners ordered by name.
    async fn list_partners(&self) -> AppResult<Vec<Partner>>;
    async fn get_partner(&self, id: i32) -> AppResult<Option<Partner>>;
    async fn insert_partner(&self, req: &CreatePartnerRequest) -> AppResult<Partner>;
    /// Delete a partner with its projects, reports, events and templates.
    ///
    /// Returns the file paths of the deleted reports, or `None` when the
    /// partner does not exist.
    async fn delete_partner(&self, id: i32) -> AppResult<Option<Vec<String>>>;

    /// Projects, newest first, optionally restricted to one partner.
    async fn list_projects(&self, partner_id: Option<i32>) -> AppResult<Vec<Project>>;
    async fn get_project(&self, id: i32) -> AppResult<Option<Project>>;
    async fn insert_project(&self, req: &CreateProjectRequest) -> AppResult<Project>;
    /// Merge one point into a project's evolution series as a single
    /// read-modify-write, so concurrent recordings never lose a point.
    async fn record_project_point(
        &self,
        id: i32,
        point: EvolutionPoint,
    ) -> AppResult<Option<Project>>;

    /// Reports ordered by deadline (undated last).
    async fn list_reports(&self, filter: &ReportFilter) -> AppResult<Vec<Report>>;
    async fn get_report(&self, id: i32) -> AppResult<Option<Report>>;
    async fn insert_report(&self, new: &NewReport) -> AppResult<Report>;
    /// Persist status, submission date and file path of an existing report.
    async fn update_report(&self, report: &Report) -> AppResult<Report>;
    /// Delete a report row, returning it when it existed.
    async fn delete_report(&self, id: i32) -> AppResult<Option<Report>>;

    /// Stored events ordered by date.
    async fn list_events(&self, filter: PartnerFilter) -> AppResult<Vec<Event>>;
    async fn insert_event(&self, req: &CreateEventRequest) -> AppResult<Event>;

    /// Templates, newest first, optionally restricted to one partner.
    async fn list_templates(&self, partner_id: Option<i32>) -> AppResult<Vec<ReportTemplate>>;
    async fn insert_template(&self, req: &CreateTemplateRequest) -> AppResult<ReportTemplate>;
}

/// Pick the store for the whole process lifetime.
///
/// An unreachable database is not fatal: the server falls back to the
/// in-memory demonstration dataset and says so once.
pub async fn select_store(config: &Config) -> Arc<dyn PortalStore> {
    if config.database_engine == DatabaseEngine::Memory {
        tracing::info!("Using in-memory store with demonstration data");
        return Arc::new(MemoryStore::with_demo_data());
    }

    let pool = match DbPool::new(config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(
                "Database unreachable ({}), falling back to in-memory demonstration data",
                e
            );
            return Arc::new(MemoryStore::with_demo_data());
        }
    };

    if let Err(e) = pool.run_migrations().await {
        tracing::warn!(
            "Database migrations failed ({}), falling back to in-memory demonstration data",
            e
        );
        return Arc::new(MemoryStore::with_demo_data());
    }

    tracing::info!("Using {} store", config.database_engine);
    Arc::new(pool)
}
