//! Shared helpers for the API integration tests.

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, http::header, test, web};
use luxdev_portal_lib::api;
use luxdev_portal_lib::middleware::RequestLogger;
use luxdev_portal_lib::services::{AiGateway, LocalStorage};
use luxdev_portal_lib::store::{MemoryStore, PortalStore};
use serde_json::Value;
use tempfile::TempDir;

/// Upload limit used unless a test overrides it.
pub const TEST_MAX_UPLOAD_SIZE: usize = 1024 * 1024;

const BOUNDARY: &str = "----luxdev-test-boundary";

/// Store, upload directory and limits backing one test app.
pub struct TestContext {
    pub store: Arc<dyn PortalStore>,
    pub storage: web::Data<LocalStorage>,
    pub max_upload_size: usize,
    // Removed from disk when the context is dropped.
    pub upload_dir: TempDir,
}

impl TestContext {
    /// Empty in-memory store.
    pub async fn empty() -> Self {
        Self::with_store(Arc::new(MemoryStore::new())).await
    }

    /// In-memory store seeded with the demonstration dataset.
    pub async fn demo() -> Self {
        Self::with_store(Arc::new(MemoryStore::with_demo_data())).await
    }

    pub async fn with_store(store: Arc<dyn PortalStore>) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create temp upload dir");
        let storage = LocalStorage::new(upload_dir.path().to_path_buf())
            .await
            .expect("Failed to create storage");

        Self {
            store,
            storage: web::Data::new(storage),
            max_upload_size: TEST_MAX_UPLOAD_SIZE,
            upload_dir,
        }
    }

    /// Absolute path of a stored upload.
    pub fn upload_path(&self, relative: &str) -> std::path::PathBuf {
        self.upload_dir.path().join(relative)
    }
}

/// Create a test portal app over the context's store.
pub async fn create_test_app(
    ctx: &TestContext,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .wrap(RequestLogger)
            .app_data(web::Data::from(ctx.store.clone()))
            .app_data(ctx.storage.clone())
            .app_data(web::Data::new(AiGateway::offline()))
            .app_data(web::Data::new(ctx.max_upload_size))
            .service(web::scope("/api").configure(api::configure_routes)),
    )
    .await
}

/// Call the app and decode the JSON body (`Null` for empty bodies).
pub async fn send<S>(app: &S, req: actix_http::Request) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get<S>(app: &S, uri: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::get().uri(uri).to_request()).await
}

pub async fn post_json<S>(app: &S, uri: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(
        app,
        test::TestRequest::post().uri(uri).set_json(body).to_request(),
    )
    .await
}

pub async fn delete<S>(app: &S, uri: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::delete().uri(uri).to_request()).await
}

/// POST a multipart body with one file part and optional text fields.
pub async fn post_multipart<S>(
    app: &S,
    uri: &str,
    file_field: &str,
    file_name: &str,
    content: &[u8],
    fields: &[(&str, &str)],
) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{file_field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
        .to_request();
    send(app, req).await
}

/// Create a partner through the API and return its id.
pub async fn create_partner<S>(app: &S, body: Value) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, partner) = post_json(app, "/api/partners", body).await;
    assert_eq!(status, 201, "partner creation failed: {:?}", partner);
    partner["id"].as_i64().expect("partner id")
}

/// Create a project through the API and return its id.
pub async fn create_project<S>(app: &S, partner_id: i64, title: &str) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, project) = post_json(
        app,
        "/api/projects",
        serde_json::json!({ "partner_id": partner_id, "title": title }),
    )
    .await;
    assert_eq!(status, 201, "project creation failed: {:?}", project);
    project["id"].as_i64().expect("project id")
}

/// Create a report through the API and return its id.
pub async fn create_report<S>(app: &S, body: Value) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, report) = post_json(app, "/api/reports", body).await;
    assert_eq!(status, 201, "report creation failed: {:?}", report);
    report["id"].as_i64().expect("report id")
}

/// Long enough narrative text to go through the full analysis path.
pub const NARRATIVE_TEXT: &str = "Le projet a réalisé la formation de quarante agents de santé communautaires. \
    Un retard de livraison des équipements solaires a été constaté au mois de mars. \
    Les comités de gestion ont été installés dans trois villages de la région.";
