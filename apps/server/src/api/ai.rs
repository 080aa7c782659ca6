//! AI assistant endpoints: template drafting and ad-hoc report summaries.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use tracing::info;

use crate::error::AppResult;
use crate::models::{GenerateTemplateRequest, ReportKind};
use crate::services::AiGateway;
use crate::services::extraction::extract_text_blocking;
use crate::services::upload::collect_upload;

/// Draft a report template from a free-text description.
#[utoipa::path(
    post,
    path = "/api/ai/generate-template",
    tag = "AI",
    request_body = GenerateTemplateRequest,
    responses(
        (status = 200, description = "Generated template", body = crate::models::GeneratedTemplate),
        (status = 400, description = "Empty prompt", body = crate::error::ErrorResponse),
    )
)]
pub async fn generate_template(
    ai: web::Data<AiGateway>,
    body: web::Json<GenerateTemplateRequest>,
) -> AppResult<HttpResponse> {
    let template = ai.generate_template(&body.prompt).await?;
    info!(
        sections = template.structure.len(),
        "Template generated: {}",
        template.title
    );
    Ok(HttpResponse::Ok().json(template))
}

/// Summarize an uploaded report document.
///
/// Expects a `report` file field and an optional `type` text field
/// (`narrative` or `financial`).
#[utoipa::path(
    post,
    path = "/api/ai/summarize",
    tag = "AI",
    request_body(content_type = "multipart/form-data", description = "`report` file and optional `type` field"),
    responses(
        (status = 200, description = "Report summary", body = crate::models::SummaryResponse),
        (status = 400, description = "Missing file or unsupported format", body = crate::error::ErrorResponse),
    )
)]
pub async fn summarize(
    ai: web::Data<AiGateway>,
    max_upload_size: web::Data<usize>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = collect_upload(payload, &["report"], *max_upload_size.get_ref()).await?;
    let kind = form.field("type").map(ReportKind::parse).unwrap_or_default();
    let (file, _) = form.require_file("report")?;

    let file_name = file.file_name;
    let text = extract_text_blocking(file_name.clone(), file.data).await?;
    let summary = ai.summarize(&text, kind).await;
    info!(
        file = %file_name,
        chars = text.chars().count(),
        kind = kind.as_str(),
        source = ?summary.source,
        "Document summarized"
    );
    Ok(HttpResponse::Ok().json(summary))
}

/// Configure AI routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ai/generate-template").route(web::post().to(generate_template)))
        .service(web::resource("/ai/summarize").route(web::post().to(summarize)));
}
