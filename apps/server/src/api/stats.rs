//! Dashboard statistics endpoints.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::error::AppResult;
use crate::models::{PartnerFilter, ProgressPoint, ReportFilter, SummaryStats};
use crate::services::timeline::{build_calendar, progress_series, summary_stats};
use crate::store::PortalStore;

/// Expected-versus-actual report submission curve.
#[utoipa::path(
    get,
    path = "/api/stats/global",
    tag = "Stats",
    responses(
        (status = 200, description = "One point per month", body = Vec<ProgressPoint>),
    )
)]
pub async fn global_progress(store: web::Data<dyn PortalStore>) -> AppResult<HttpResponse> {
    let projects = store.list_projects(None).await?;
    let reports = store.list_reports(&ReportFilter::default()).await?;

    let series = progress_series(&projects, &reports, Utc::now());
    Ok(HttpResponse::Ok().json(series))
}

/// Headline counters for the dashboard.
#[utoipa::path(
    get,
    path = "/api/stats/summary",
    tag = "Stats",
    responses(
        (status = 200, description = "Dashboard counters", body = SummaryStats),
    )
)]
pub async fn summary(store: web::Data<dyn PortalStore>) -> AppResult<HttpResponse> {
    let now = Utc::now();
    let partners = store.list_partners().await?;
    let projects = store.list_projects(None).await?;
    let reports = store.list_reports(&ReportFilter::default()).await?;
    let events = store.list_events(PartnerFilter::All).await?;

    let calendar = build_calendar(
        &events,
        &reports,
        &projects,
        &partners,
        PartnerFilter::All,
        now,
    );
    let stats = summary_stats(&partners, &projects, &reports, &calendar, now);
    Ok(HttpResponse::Ok().json(stats))
}

/// Configure stats routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/stats/global").route(web::get().to(global_progress)))
        .service(web::resource("/stats/summary").route(web::get().to(summary)));
}
