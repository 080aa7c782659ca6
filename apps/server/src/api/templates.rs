//! Report template API handlers.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{CreateTemplateRequest, ListTemplatesQuery, TemplateView};
use crate::store::PortalStore;

/// List templates with their partner's name.
#[utoipa::path(
    get,
    path = "/api/templates",
    tag = "Templates",
    params(ListTemplatesQuery),
    responses(
        (status = 200, description = "Templates", body = Vec<TemplateView>),
    )
)]
pub async fn list_templates(
    store: web::Data<dyn PortalStore>,
    query: web::Query<ListTemplatesQuery>,
) -> AppResult<HttpResponse> {
    let templates = store.list_templates(query.partner_id).await?;
    let names: HashMap<i32, String> = store
        .list_partners()
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let views: Vec<TemplateView> = templates
        .into_iter()
        .map(|template| TemplateView {
            partner_name: names.get(&template.partner_id).cloned(),
            template,
        })
        .collect();
    Ok(HttpResponse::Ok().json(views))
}

/// Save a template for a partner.
#[utoipa::path(
    post,
    path = "/api/templates",
    tag = "Templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template saved", body = crate::models::ReportTemplate),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Partner not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_template(
    store: web::Data<dyn PortalStore>,
    body: web::Json<CreateTemplateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    if store.get_partner(req.partner_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Partner {}", req.partner_id)));
    }

    let template = store.insert_template(&req).await?;
    info!(
        template_id = template.id,
        partner_id = template.partner_id,
        sections = template.structure.len(),
        "Template saved: {}",
        template.title
    );
    Ok(HttpResponse::Created().json(template))
}

/// Configure template routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/templates")
            .route(web::get().to(list_templates))
            .route(web::post().to(create_template)),
    );
}
