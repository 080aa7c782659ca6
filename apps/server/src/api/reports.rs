//! Report API handlers.

use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{
    AnalyzeQuery, CreateReportRequest, ListReportsQuery, Report, ReportFilter, ReportKind,
    ReportView, UpdateReportStatusRequest,
};
use crate::services::extraction::extract_text_blocking;
use crate::services::upload::collect_upload;
use crate::services::{AiGateway, LocalStorage};
use crate::store::PortalStore;

/// Multipart fields accepted for a report file.
const REPORT_FILE_FIELDS: &[&str] = &["file", "report"];

/// Enrich reports with their project title, owning partner and effective status.
async fn report_views(store: &dyn PortalStore, reports: Vec<Report>) -> AppResult<Vec<ReportView>> {
    let projects: HashMap<i32, (i32, String)> = store
        .list_projects(None)
        .await?
        .into_iter()
        .map(|p| (p.id, (p.partner_id, p.title)))
        .collect();
    let partners: HashMap<i32, String> = store
        .list_partners()
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let today = Utc::now().date_naive();

    Ok(reports
        .into_iter()
        .map(|report| {
            let project = projects.get(&report.project_id);
            let partner = project.and_then(|(partner_id, _)| {
                partners
                    .get(partner_id)
                    .map(|name| (*partner_id, name.clone()))
            });
            let project_title = project.map(|(_, title)| title.clone());
            ReportView::new(report, today, partner, project_title)
        })
        .collect())
}

async fn report_view(store: &dyn PortalStore, report: Report) -> AppResult<ReportView> {
    let project = store.get_project(report.project_id).await?;
    let partner = match &project {
        Some(p) => store.get_partner(p.partner_id).await?,
        None => None,
    };

    Ok(ReportView::new(
        report,
        Utc::now().date_naive(),
        partner.map(|p| (p.id, p.name)),
        project.map(|p| p.title),
    ))
}

async fn find_report(store: &dyn PortalStore, report_id: i32) -> AppResult<Report> {
    store
        .get_report(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {}", report_id)))
}

/// List reports ordered by deadline.
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Reports", body = Vec<ReportView>),
    )
)]
pub async fn list_reports(
    store: web::Data<dyn PortalStore>,
    query: web::Query<ListReportsQuery>,
) -> AppResult<HttpResponse> {
    let filter = ReportFilter::from(&query.into_inner());
    let reports = store.list_reports(&filter).await?;
    let views = report_views(store.get_ref(), reports).await?;
    Ok(HttpResponse::Ok().json(views))
}

/// Create a report for an existing project.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "Reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report created", body = ReportView),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_report(
    store: web::Data<dyn PortalStore>,
    body: web::Json<CreateReportRequest>,
) -> AppResult<HttpResponse> {
    let new = body.into_inner().into_new_report()?;

    if store.get_project(new.project_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Project {}", new.project_id)));
    }

    let report = store.insert_report(&new).await?;
    info!(
        report_id = report.id,
        project_id = report.project_id,
        status = %report.status,
        "Report created: {}",
        report.title
    );
    Ok(HttpResponse::Created().json(report_view(store.get_ref(), report).await?))
}

/// Get a report.
#[utoipa::path(
    get,
    path = "/api/reports/{report_id}",
    tag = "Reports",
    params(("report_id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report", body = ReportView),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_report(
    store: web::Data<dyn PortalStore>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let report = find_report(store.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report_view(store.get_ref(), report).await?))
}

/// Delete a report and its attached file.
#[utoipa::path(
    delete,
    path = "/api/reports/{report_id}",
    tag = "Reports",
    params(("report_id" = i32, Path, description = "Report ID")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_report(
    store: web::Data<dyn PortalStore>,
    storage: web::Data<LocalStorage>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let report_id = path.into_inner();
    let report = store
        .delete_report(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {}", report_id)))?;

    if let Some(file_path) = &report.file_path {
        // The row is gone either way; a leftover file only costs disk space.
        match storage.delete(file_path).await {
            Ok(true) => info!(report_id, "Removed report file {}", file_path),
            Ok(false) => warn!(report_id, "Report file {} was already missing", file_path),
            Err(e) => warn!(report_id, "Failed to remove report file {}: {}", file_path, e),
        }
    }

    info!(report_id, "Report deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Submit a report file.
///
/// Accepts one file in a `file` or `report` multipart field. The submission
/// date is set to now and the report moves to pending unless it was
/// already validated.
#[utoipa::path(
    post,
    path = "/api/reports/{report_id}/submit",
    tag = "Reports",
    params(("report_id" = i32, Path, description = "Report ID")),
    request_body(content_type = "multipart/form-data", description = "Report file in a `file` or `report` field"),
    responses(
        (status = 200, description = "Report submitted", body = ReportView),
        (status = 400, description = "Missing or oversized file", body = crate::error::ErrorResponse),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn submit_report(
    store: web::Data<dyn PortalStore>,
    storage: web::Data<LocalStorage>,
    max_upload_size: web::Data<usize>,
    path: web::Path<i32>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let report_id = path.into_inner();
    let mut report = find_report(store.get_ref(), report_id).await?;

    let form = collect_upload(payload, REPORT_FILE_FIELDS, *max_upload_size.get_ref()).await?;
    let (file, _) = form.require_file("file")?;

    let stored = storage.put(report_id, &file.file_name, &file.data).await?;
    let previous = report.file_path.clone();
    report.mark_submitted(Utc::now(), Some(stored.clone()));

    let report = match store.update_report(&report).await {
        Ok(report) => report,
        Err(e) => {
            storage.delete_all(std::slice::from_ref(&stored)).await;
            return Err(e);
        }
    };

    if let Some(previous) = previous.filter(|p| *p != stored) {
        storage.delete_all(&[previous]).await;
    }

    info!(
        report_id,
        size = file.data.len(),
        status = %report.status,
        "Report submitted: {}",
        stored
    );
    Ok(HttpResponse::Ok().json(report_view(store.get_ref(), report).await?))
}

/// Change a report's status.
#[utoipa::path(
    patch,
    path = "/api/reports/{report_id}/status",
    tag = "Reports",
    params(("report_id" = i32, Path, description = "Report ID")),
    request_body = UpdateReportStatusRequest,
    responses(
        (status = 200, description = "Report updated", body = ReportView),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_report_status(
    store: web::Data<dyn PortalStore>,
    path: web::Path<i32>,
    body: web::Json<UpdateReportStatusRequest>,
) -> AppResult<HttpResponse> {
    let report_id = path.into_inner();
    let mut report = find_report(store.get_ref(), report_id).await?;

    let previous = report.status;
    report.status = body.into_inner().status;
    let report = store.update_report(&report).await?;

    info!(report_id, from = %previous, to = %report.status, "Report status changed");
    Ok(HttpResponse::Ok().json(report_view(store.get_ref(), report).await?))
}

/// Summarize the file attached to a report.
#[utoipa::path(
    post,
    path = "/api/reports/{report_id}/analyze",
    tag = "Reports",
    params(
        ("report_id" = i32, Path, description = "Report ID"),
        AnalyzeQuery,
    ),
    responses(
        (status = 200, description = "Report summary", body = crate::models::SummaryResponse),
        (status = 400, description = "No file attached or unsupported format", body = crate::error::ErrorResponse),
        (status = 404, description = "Report or file not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn analyze_report(
    store: web::Data<dyn PortalStore>,
    storage: web::Data<LocalStorage>,
    ai: web::Data<AiGateway>,
    path: web::Path<i32>,
    query: web::Query<AnalyzeQuery>,
) -> AppResult<HttpResponse> {
    let report_id = path.into_inner();
    let report = find_report(store.get_ref(), report_id).await?;
    let file_path = report.file_path.ok_or_else(|| {
        AppError::InvalidInput(format!("Report {} has no attached file", report_id))
    })?;

    let kind = query
        .kind
        .as_deref()
        .map(ReportKind::parse)
        .unwrap_or_default();
    let bytes = storage.read(&file_path).await?;
    let text = extract_text_blocking(file_path, bytes).await?;

    let summary = ai.summarize(&text, kind).await;
    info!(
        report_id,
        kind = kind.as_str(),
        source = ?summary.source,
        "Report analyzed"
    );
    Ok(HttpResponse::Ok().json(summary))
}

/// Configure report routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/reports")
            .route(web::get().to(list_reports))
            .route(web::post().to(create_report)),
    )
    .service(
        web::resource("/reports/{report_id}")
            .route(web::get().to(get_report))
            .route(web::delete().to(delete_report)),
    )
    .service(web::resource("/reports/{report_id}/submit").route(web::post().to(submit_report)))
    .service(
        web::resource("/reports/{report_id}/status").route(web::patch().to(update_report_status)),
    )
    .service(
        web::resource("/reports/{report_id}/analyze").route(web::post().to(analyze_report)),
    );
}
