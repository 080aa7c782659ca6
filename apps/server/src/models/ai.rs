//! AI gateway request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Kind of report being summarized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    #[default]
    Narrative,
    Financial,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Narrative => "narrative",
            Self::Financial => "financial",
        }
    }

    /// Unknown or missing kinds summarize as narrative reports.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "financial" | "financier" | "finance" => Self::Financial,
            _ => Self::Narrative,
        }
    }
}

/// Narrative report summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NarrativeSummary {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Financial report summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FinancialSummary {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub budget_total_used: String,
    #[serde(default)]
    pub key_figures: Vec<String>,
    #[serde(default)]
    pub anomalies: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Answer for documents with no usable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UnreadableSummary {
    pub summary: String,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Summary body; its shape depends on the report kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ReportSummary {
    Narrative(NarrativeSummary),
    Financial(FinancialSummary),
    Unreadable(UnreadableSummary),
}

/// Who produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    /// The generative-language provider.
    Model,
    /// Keyword heuristics run locally.
    Local,
    /// Fixed answer for unreadable input.
    Fixed,
}

/// Summarization response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub kind: ReportKind,
    pub source: SummarySource,
    #[serde(flatten)]
    pub body: ReportSummary,
}

/// Request body for template generation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateTemplateRequest {
    pub prompt: String,
}

/// Query parameters of the stored-report analysis endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AnalyzeQuery {
    /// `narrative` (default) or `financial`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}
