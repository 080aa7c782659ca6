//! LuxDev partner portal server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::path::PathBuf;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{App, HttpRequest, HttpServer, Result as ActixResult, http::header, web};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use luxdev_portal_lib::api::{self, ApiDoc};
use luxdev_portal_lib::config::{Config, describe_key};
use luxdev_portal_lib::middleware::RequestLogger;
use luxdev_portal_lib::services::{AiGateway, LocalStorage};
use luxdev_portal_lib::store::select_store;

/// SPA fallback handler - serves index.html for client-side routing.
async fn spa_fallback(
    req: HttpRequest,
    static_dir: web::Data<PathBuf>,
) -> ActixResult<NamedFile> {
    let index = static_dir.join("index.html");
    tracing::debug!("SPA fallback for {}", req.path());
    Ok(NamedFile::open(index)?)
}

/// Perform health check (for Docker healthcheck).
async fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        if health_check().await {
            std::process::exit(0);
        } else {
            std::process::exit(1);
        }
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL must be set to a non-default value");
            error!("  - LUXDEV_AI_TIMEOUT_SECS must be between 1 and 120");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  LuxDev Partner Portal");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let storage = match LocalStorage::new(config.upload_dir.clone()).await {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to prepare upload directory {:?}: {}", config.upload_dir, e);
            std::process::exit(1);
        }
    };
    info!("Uploads stored in {:?}", storage.root());

    let store = select_store(&config).await;
    if store.is_mock() {
        warn!("Serving demonstration data; changes are lost on restart");
    }

    info!(
        "Generative model: {} (key {}, timeout {:?})",
        config.ai.model,
        describe_key(&config.ai.api_key),
        config.ai.timeout
    );
    let ai = AiGateway::from_settings(&config.ai);

    // Prepare shared state
    let bind_address = config.bind_address();
    let max_upload_size = config.max_upload_size;
    let static_dir = config.static_dir.clone();
    let upload_dir = storage.root().to_path_buf();
    let is_development = config.is_development();
    let store_data = web::Data::from(store);
    let storage_data = web::Data::new(storage);
    let ai_data = web::Data::new(ai);
    let openapi = ApiDoc::openapi();

    info!("Upload limit: {}MB", max_upload_size / 1024 / 1024);

    if static_dir.is_some() {
        info!("Static file serving enabled from {:?}", static_dir);
    }

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        let cors = if is_development {
            // Permissive CORS for the development front-end
            Cors::default()
                .allowed_origin("http://localhost:5173")
                .allowed_origin("http://127.0.0.1:5173")
                .allowed_origin("http://localhost:3000")
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        } else {
            // Same-origin only in production
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        let mut app = App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            .wrap(RequestLogger)
            // Add shared state
            .app_data(store_data.clone())
            .app_data(storage_data.clone())
            .app_data(ai_data.clone())
            .app_data(web::Data::new(max_upload_size))
            // Limit enforced while streaming multipart bodies; leave room for form overhead
            .app_data(web::PayloadConfig::new(max_upload_size * 2))
            .service(
                SwaggerUi::new("/api/docs/{_:.*}").url("/api/openapi.json", openapi.clone()),
            )
            .service(web::scope("/api").configure(api::configure_routes))
            .service(Files::new("/uploads", upload_dir.clone()));

        // Serve the SPA build when LUXDEV_STATIC_DIR is set
        if let Some(ref dir) = static_dir {
            app = app
                .app_data(web::Data::new(dir.clone()))
                .service(Files::new("/assets", dir.join("assets")).prefer_utf8(true))
                .default_service(web::route().to(spa_fallback));
        }

        app
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
