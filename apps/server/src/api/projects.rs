//! Project API handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};
use crate::models::{CreateProjectRequest, EvolutionPoint};
use crate::store::PortalStore;

/// Project filters for listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListProjectsQuery {
    #[serde(default, rename = "partnerId", alias = "partner_id")]
    pub partner_id: Option<i32>,
}

/// List projects, newest first.
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    params(ListProjectsQuery),
    responses(
        (status = 200, description = "Projects", body = Vec<crate::models::Project>),
    )
)]
pub async fn list_projects(
    store: web::Data<dyn PortalStore>,
    query: web::Query<ListProjectsQuery>,
) -> AppResult<HttpResponse> {
    let projects = store.list_projects(query.partner_id).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// Create a project for an existing partner.
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = crate::models::Project),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Partner not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_project(
    store: web::Data<dyn PortalStore>,
    body: web::Json<CreateProjectRequest>,
) -> AppResult<HttpResponse> {
    let mut req = body.into_inner();
    req.validate()?;

    if store.get_partner(req.partner_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Partner {}", req.partner_id)));
    }

    req.evolution_data = req.normalized_evolution();
    let project = store.insert_project(&req).await?;
    info!(
        project_id = project.id,
        partner_id = project.partner_id,
        "Project created: {}",
        project.title
    );
    Ok(HttpResponse::Created().json(project))
}

/// Get a project.
#[utoipa::path(
    get,
    path = "/api/projects/{project_id}",
    tag = "Projects",
    params(("project_id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project", body = crate::models::Project),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_project(
    store: web::Data<dyn PortalStore>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    let project = store
        .get_project(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {}", project_id)))?;
    Ok(HttpResponse::Ok().json(project))
}

/// Record a monthly progress measurement.
///
/// A point for a month that already has one replaces it.
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/evolution",
    tag = "Projects",
    params(("project_id" = i32, Path, description = "Project ID")),
    request_body = EvolutionPoint,
    responses(
        (status = 200, description = "Updated project", body = crate::models::Project),
        (status = 400, description = "Invalid point", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn record_evolution(
    store: web::Data<dyn PortalStore>,
    path: web::Path<i32>,
    body: web::Json<EvolutionPoint>,
) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    let point = body.into_inner();
    point.validate()?;

    let updated = store
        .record_project_point(project_id, point)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {}", project_id)))?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Configure project routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects")
            .route(web::get().to(list_projects))
            .route(web::post().to(create_project)),
    )
    .service(web::resource("/projects/{project_id}").route(web::get().to(get_project)))
    .service(
        web::resource("/projects/{project_id}/evolution")
            .route(web::post().to(record_evolution)),
    );
}
