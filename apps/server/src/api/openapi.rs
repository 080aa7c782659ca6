//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LuxDev Partner Portal",
        version = "0.1.0",
        description = "API server for partner contracts, projects, report submissions, calendars and AI-assisted report review"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Partner endpoints
        api::partners::list_partners,
        api::partners::create_partner,
        api::partners::get_partner,
        api::partners::delete_partner,
        api::partners::list_partner_projects,
        // Project endpoints
        api::projects::list_projects,
        api::projects::create_project,
        api::projects::get_project,
        api::projects::record_evolution,
        // Report endpoints
        api::reports::list_reports,
        api::reports::create_report,
        api::reports::get_report,
        api::reports::delete_report,
        api::reports::submit_report,
        api::reports::update_report_status,
        api::reports::analyze_report,
        // Calendar endpoints
        api::events::list_calendar,
        api::events::create_event,
        // Template endpoints
        api::templates::list_templates,
        api::templates::create_template,
        // AI endpoints
        api::ai::generate_template,
        api::ai::summarize,
        // Stats endpoints
        api::stats::global_progress,
        api::stats::summary,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Partners
            models::MeetingFrequency,
            models::Partner,
            models::CreatePartnerRequest,
            models::ContractProgress,
            models::PartnerDetail,
            // Projects
            models::ProjectStatus,
            models::EvolutionPoint,
            models::Project,
            models::CreateProjectRequest,
            // Reports
            models::ReportStatus,
            models::Report,
            models::ReportView,
            models::CreateReportRequest,
            models::UpdateReportStatusRequest,
            models::ListReportsQuery,
            // Calendar
            models::EventType,
            models::Event,
            models::CreateEventRequest,
            models::CalendarSource,
            models::CalendarItem,
            // Templates
            models::TemplateSection,
            models::GeneratedTemplate,
            models::ReportTemplate,
            models::CreateTemplateRequest,
            models::TemplateView,
            // AI
            models::ReportKind,
            models::GenerateTemplateRequest,
            models::NarrativeSummary,
            models::FinancialSummary,
            models::UnreadableSummary,
            models::ReportSummary,
            models::SummarySource,
            models::SummaryResponse,
            // Stats
            models::ProgressPoint,
            models::SummaryStats,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Partners", description = "Partner organizations and their contracts"),
        (name = "Projects", description = "Projects and progress history"),
        (name = "Reports", description = "Report lifecycle, submissions and analysis"),
        (name = "Calendar", description = "Stored events and the derived calendar"),
        (name = "Templates", description = "Reporting templates"),
        (name = "AI", description = "Template drafting and report summaries"),
        (name = "Stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;
