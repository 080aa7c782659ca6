//! Calendar API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{CalendarItem, CalendarQuery, CreateEventRequest, PartnerFilter, ReportFilter};
use crate::services::timeline::build_calendar;
use crate::store::PortalStore;

/// Build the unified calendar for one partner or all of them.
async fn load_calendar(
    store: &dyn PortalStore,
    filter: PartnerFilter,
) -> AppResult<Vec<CalendarItem>> {
    let events = store.list_events(filter).await?;
    let reports = store
        .list_reports(&ReportFilter {
            project_id: None,
            partner_id: filter.partner_id(),
        })
        .await?;
    let projects = store.list_projects(filter.partner_id()).await?;
    let partners = store.list_partners().await?;

    Ok(build_calendar(
        &events,
        &reports,
        &projects,
        &partners,
        filter,
        Utc::now(),
    ))
}

/// Unified calendar: stored events, report deadlines and recurring meetings.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Calendar items ordered by date", body = Vec<CalendarItem>),
        (status = 400, description = "Invalid partner filter", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_calendar(
    store: web::Data<dyn PortalStore>,
    query: web::Query<CalendarQuery>,
) -> AppResult<HttpResponse> {
    let filter = PartnerFilter::parse(query.partner_id.as_deref())?;
    let items = load_calendar(store.get_ref(), filter).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Create a stored calendar event.
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Calendar",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = crate::models::Event),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Partner not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_event(
    store: web::Data<dyn PortalStore>,
    body: web::Json<CreateEventRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    if let Some(partner_id) = req.partner_id
        && store.get_partner(partner_id).await?.is_none()
    {
        return Err(AppError::NotFound(format!("Partner {}", partner_id)));
    }

    let event = store.insert_event(&req).await?;
    info!(
        event_id = event.id,
        partner_id = ?event.partner_id,
        "Event created: {}",
        event.title
    );
    Ok(HttpResponse::Created().json(event))
}

/// Configure calendar routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/events")
            .route(web::get().to(list_calendar))
            .route(web::post().to(create_event)),
    );
}
