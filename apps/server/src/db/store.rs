//! `PortalStore` implementation over SeaORM.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{
    CreateEventRequest, CreatePartnerRequest, CreateProjectRequest, CreateTemplateRequest, Event,
    EvolutionPoint, NewReport, Partner, PartnerFilter, Project, Report, ReportFilter,
    ReportTemplate,
};
use crate::store::PortalStore;

use super::DbPool;

#[async_trait]
impl PortalStore for DbPool {
    fn backend(&self) -> &'static str {
        self.engine().as_str()
    }

    async fn ping(&self) -> AppResult<()> {
        DbPool::ping(self).await
    }

    async fn list_partners(&self) -> AppResult<Vec<Partner>> {
        DbPool::list_partners(self).await
    }

    async fn get_partner(&self, id: i32) -> AppResult<Option<Partner>> {
        DbPool::get_partner(self, id).await
    }

    async fn insert_partner(&self, req: &CreatePartnerRequest) -> AppResult<Partner> {
        DbPool::insert_partner(self, req).await
    }

    async fn delete_partner(&self, id: i32) -> AppResult<Option<Vec<String>>> {
        self.delete_partner_cascade(id).await
    }

    async fn list_projects(&self, partner_id: Option<i32>) -> AppResult<Vec<Project>> {
        DbPool::list_projects(self, partner_id).await
    }

    async fn get_project(&self, id: i32) -> AppResult<Option<Project>> {
        DbPool::get_project(self, id).await
    }

    async fn insert_project(&self, req: &CreateProjectRequest) -> AppResult<Project> {
        DbPool::insert_project(self, req).await
    }

    async fn record_project_point(
        &self,
        id: i32,
        point: EvolutionPoint,
    ) -> AppResult<Option<Project>> {
        DbPool::record_project_point(self, id, point).await
    }

    async fn list_reports(&self, filter: &ReportFilter) -> AppResult<Vec<Report>> {
        DbPool::list_reports(self, filter).await
    }

    async fn get_report(&self, id: i32) -> AppResult<Option<Report>> {
        DbPool::get_report(self, id).await
    }

    async fn insert_report(&self, new: &NewReport) -> AppResult<Report> {
        DbPool::insert_report(self, new).await
    }

    async fn update_report(&self, report: &Report) -> AppResult<Report> {
        DbPool::update_report(self, report).await
    }

    async fn delete_report(&self, id: i32) -> AppResult<Option<Report>> {
        DbPool::delete_report(self, id).await
    }

    async fn list_events(&self, filter: PartnerFilter) -> AppResult<Vec<Event>> {
        DbPool::list_events(self, filter).await
    }

    async fn insert_event(&self, req: &CreateEventRequest) -> AppResult<Event> {
        DbPool::insert_event(self, req).await
    }

    async fn list_templates(&self, partner_id: Option<i32>) -> AppResult<Vec<ReportTemplate>> {
        DbPool::list_templates(self, partner_id).await
    }

    async fn insert_template(&self, req: &CreateTemplateRequest) -> AppResult<ReportTemplate> {
        DbPool::insert_template(self, req).await
    }
}
