//! Report domain models and DTOs.
//!
//! A report moves `draft -> pending -> validated`. `late` is normally not
//! stored: it is derived on read for pending reports whose deadline has
//! passed without a submission.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::report;
use crate::error::{AppError, AppResult};

use super::dates::{deserialize_optional_date, deserialize_optional_timestamp};

/// Report status enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Pending,
    Validated,
    Late,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Validated => "validated",
            Self::Late => "late",
        }
    }

    /// Parse a status, accepting the French labels used by older clients.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" | "brouillon" => Some(Self::Draft),
            "pending" | "en attente" => Some(Self::Pending),
            "validated" | "validé" | "valide" => Some(Self::Validated),
            "late" | "en retard" => Some(Self::Late),
            _ => None,
        }
    }

    /// Status after a file has been submitted for this report.
    ///
    /// Validation stays an explicit reviewer action, so a validated report is
    /// never downgraded and every other state becomes pending.
    pub fn after_submission(self) -> Self {
        match self {
            Self::Validated => Self::Validated,
            Self::Draft | Self::Pending | Self::Late => Self::Pending,
        }
    }
}

impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown report status '{}'", raw)))
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A periodic submission tied to a project and a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub id: i32,
    pub project_id: i32,
    pub title: String,
    pub deadline: Option<NaiveDate>,
    /// `None` until the partner submits the report.
    pub submission_date: Option<DateTime<Utc>>,
    pub status: ReportStatus,
    /// Uploaded artifact, relative to the upload directory.
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn from_entity(model: report::Model) -> Self {
        Self {
            id: model.id,
            project_id: model.project_id,
            title: model.title,
            deadline: model.deadline,
            submission_date: model.submission_date,
            status: ReportStatus::parse(&model.status).unwrap_or(ReportStatus::Pending),
            file_path: model.file_path,
            created_at: model.created_at,
        }
    }

    /// Status as shown to clients on `today`.
    pub fn effective_status(&self, today: NaiveDate) -> ReportStatus {
        match (self.status, self.deadline, self.submission_date) {
            (ReportStatus::Pending, Some(deadline), None) if deadline < today => {
                ReportStatus::Late
            }
            (status, _, _) => status,
        }
    }

    /// Record a submission made at `at`.
    pub fn mark_submitted(&mut self, at: DateTime<Utc>, file_path: Option<String>) {
        self.submission_date = Some(at);
        self.status = self.status.after_submission();
        if file_path.is_some() {
            self.file_path = file_path;
        }
    }
}

/// Validated fields of a report about to be inserted.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub project_id: i32,
    pub title: String,
    pub deadline: Option<NaiveDate>,
    pub submission_date: Option<DateTime<Utc>>,
    pub status: ReportStatus,
}

/// Request body for creating a report.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateReportRequest {
    pub project_id: i32,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub submission_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<ReportStatus>,
}

impl CreateReportRequest {
    pub fn into_new_report(self) -> AppResult<NewReport> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::InvalidInput("title is required".to_string()));
        }

        Ok(NewReport {
            project_id: self.project_id,
            title,
            deadline: self.deadline,
            submission_date: self.submission_date,
            status: self.status.unwrap_or(ReportStatus::Pending),
        })
    }
}

/// Request body for an explicit status change.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateReportStatusRequest {
    pub status: ReportStatus,
}

/// Report filters for listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListReportsQuery {
    #[serde(default, rename = "projectId", alias = "project_id")]
    pub project_id: Option<i32>,
    #[serde(default, rename = "partnerId", alias = "partner_id")]
    pub partner_id: Option<i32>,
}

/// Store-level report filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub project_id: Option<i32>,
    pub partner_id: Option<i32>,
}

impl From<&ListReportsQuery> for ReportFilter {
    fn from(query: &ListReportsQuery) -> Self {
        Self {
            project_id: query.project_id,
            partner_id: query.partner_id,
        }
    }
}

/// Report as returned by the API, enriched with its owners and effective status.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportView {
    #[serde(flatten)]
    pub report: Report,
    pub partner_id: Option<i32>,
    pub partner_name: Option<String>,
    pub project_title: Option<String>,
    /// Public URL of the uploaded artifact.
    pub file_url: Option<String>,
}

impl ReportView {
    pub fn new(
        mut report: Report,
        today: NaiveDate,
        partner: Option<(i32, String)>,
        project_title: Option<String>,
    ) -> Self {
        report.status = report.effective_status(today);
        let file_url = report
            .file_path
            .as_ref()
            .map(|path| format!("/uploads/{}", path));
        let (partner_id, partner_name) = match partner {
            Some((id, name)) => (Some(id), Some(name)),
            None => (None, None),
        };

        Self {
            report,
            partner_id,
            partner_name,
            project_title,
            file_url,
        }
    }
}
