//! API endpoint modules.

pub mod ai;
pub mod events;
pub mod health;
pub mod openapi;
pub mod partners;
pub mod projects;
pub mod reports;
pub mod stats;
pub mod templates;

use actix_web::web;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// Register every `/api` route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(partners::configure_routes)
        .configure(projects::configure_routes)
        .configure(reports::configure_routes)
        .configure(events::configure_routes)
        .configure(templates::configure_routes)
        .configure(ai::configure_routes)
        .configure(stats::configure_routes);
}
