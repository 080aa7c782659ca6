//! Partner API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{CreatePartnerRequest, PartnerDetail, PartnerFilter};
use crate::services::LocalStorage;
use crate::services::timeline::contract_progress;
use crate::store::PortalStore;

/// List partners ordered by name.
#[utoipa::path(
    get,
    path = "/api/partners",
    tag = "Partners",
    responses(
        (status = 200, description = "Partners", body = Vec<crate::models::Partner>),
    )
)]
pub async fn list_partners(store: web::Data<dyn PortalStore>) -> AppResult<HttpResponse> {
    let partners = store.list_partners().await?;
    Ok(HttpResponse::Ok().json(partners))
}

/// Create a partner.
#[utoipa::path(
    post,
    path = "/api/partners",
    tag = "Partners",
    request_body = CreatePartnerRequest,
    responses(
        (status = 201, description = "Partner created", body = crate::models::Partner),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_partner(
    store: web::Data<dyn PortalStore>,
    body: web::Json<CreatePartnerRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let partner = store.insert_partner(&req).await?;
    info!(partner_id = partner.id, "Partner created: {}", partner.name);
    Ok(HttpResponse::Created().json(partner))
}

/// Get a partner with its projects, events, templates and contract progress.
#[utoipa::path(
    get,
    path = "/api/partners/{partner_id}",
    tag = "Partners",
    params(("partner_id" = i32, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Partner detail", body = PartnerDetail),
        (status = 404, description = "Partner not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_partner(
    store: web::Data<dyn PortalStore>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let partner_id = path.into_inner();
    let partner = store
        .get_partner(partner_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Partner {}", partner_id)))?;

    let projects = store.list_projects(Some(partner_id)).await?;
    let events = store
        .list_events(PartnerFilter::Partner(partner_id))
        .await?;
    let templates = store.list_templates(Some(partner_id)).await?;
    let progress = contract_progress(&partner, Utc::now());

    Ok(HttpResponse::Ok().json(PartnerDetail {
        partner,
        projects,
        events,
        templates,
        contract_progress: progress,
    }))
}

/// Delete a partner and everything it owns.
///
/// Report files are removed from disk after the rows are gone.
#[utoipa::path(
    delete,
    path = "/api/partners/{partner_id}",
    tag = "Partners",
    params(("partner_id" = i32, Path, description = "Partner ID")),
    responses(
        (status = 204, description = "Partner deleted"),
        (status = 404, description = "Partner not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_partner(
    store: web::Data<dyn PortalStore>,
    storage: web::Data<LocalStorage>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let partner_id = path.into_inner();
    let files = store
        .delete_partner(partner_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Partner {}", partner_id)))?;

    storage.delete_all(&files).await;
    info!(
        partner_id,
        files_removed = files.len(),
        "Partner deleted with its projects, reports, events and templates"
    );
    Ok(HttpResponse::NoContent().finish())
}

/// List a partner's projects.
#[utoipa::path(
    get,
    path = "/api/partners/{partner_id}/projects",
    tag = "Partners",
    params(("partner_id" = i32, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Projects of the partner", body = Vec<crate::models::Project>),
        (status = 404, description = "Partner not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_partner_projects(
    store: web::Data<dyn PortalStore>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let partner_id = path.into_inner();
    if store.get_partner(partner_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Partner {}", partner_id)));
    }

    let projects = store.list_projects(Some(partner_id)).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// Configure partner routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/partners")
            .route(web::get().to(list_partners))
            .route(web::post().to(create_partner)),
    )
    .service(
        web::resource("/partners/{partner_id}")
            .route(web::get().to(get_partner))
            .route(web::delete().to(delete_partner)),
    )
    .service(
        web::resource("/partners/{partner_id}/projects")
            .route(web::get().to(list_partner_projects)),
    );
}
