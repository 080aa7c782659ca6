//! Domain models for the partner reporting portal.

pub mod ai;
pub mod dates;
pub mod event;
pub mod partner;
pub mod project;
pub mod report;
pub mod stats;
pub mod template;

// Re-export commonly used types
pub use ai::{
    AnalyzeQuery, FinancialSummary, GenerateTemplateRequest, NarrativeSummary, ReportKind,
    ReportSummary, SummaryResponse, SummarySource, UnreadableSummary,
};
pub use event::{
    CalendarItem, CalendarQuery, CalendarSource, CreateEventRequest, Event, EventType,
    PartnerFilter,
};
pub use partner::{
    ContractProgress, CreatePartnerRequest, MeetingFrequency, Partner, PartnerDetail,
};
pub use project::{
    CreateProjectRequest, EvolutionPoint, Project, ProjectStatus, record_point,
};
pub use report::{
    CreateReportRequest, ListReportsQuery, NewReport, Report, ReportFilter, ReportStatus,
    ReportView, UpdateReportStatusRequest,
};
pub use stats::{ProgressPoint, SummaryStats};
pub use template::{
    CreateTemplateRequest, GeneratedTemplate, ListTemplatesQuery, ReportTemplate,
    TemplateSection, TemplateView,
};
