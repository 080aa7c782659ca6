//! Partner domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::entity::partner;
use crate::error::{AppError, AppResult};

use super::dates::deserialize_optional_date;
use super::event::Event;
use super::project::Project;
use super::template::ReportTemplate;

/// Cadence of the recurring follow-up meetings held with a partner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MeetingFrequency {
    #[default]
    None,
    Weekly,
    Monthly,
    Yearly,
}

impl MeetingFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parse a stored or submitted cadence. Unknown values mean no meetings.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "hebdomadaire" => Self::Weekly,
            "monthly" | "mensuelle" => Self::Monthly,
            "yearly" | "annual" | "annuelle" => Self::Yearly,
            _ => Self::None,
        }
    }
}

impl<'de> Deserialize<'de> for MeetingFrequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

impl std::fmt::Display for MeetingFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A partner organization under contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Partner {
    pub id: i32,
    pub name: String,
    pub contact_email: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub contract_start_date: Option<NaiveDate>,
    pub contract_end_date: Option<NaiveDate>,
    pub meeting_frequency: MeetingFrequency,
    pub created_at: DateTime<Utc>,
}

impl Partner {
    pub fn from_entity(model: partner::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            contact_email: model.contact_email,
            description: model.description,
            country: model.country,
            contract_start_date: model.contract_start_date,
            contract_end_date: model.contract_end_date,
            meeting_frequency: MeetingFrequency::parse(&model.meeting_frequency),
            created_at: model.created_at,
        }
    }
}

/// Request body for creating a partner.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePartnerRequest {
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub contract_start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub contract_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub meeting_frequency: MeetingFrequency,
}

impl CreatePartnerRequest {
    /// Check required fields and contract date ordering.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidInput("name is required".to_string()));
        }

        if let (Some(start), Some(end)) = (self.contract_start_date, self.contract_end_date)
            && end < start
        {
            return Err(AppError::InvalidInput(format!(
                "contract_end_date ({}) must not precede contract_start_date ({})",
                end, start
            )));
        }

        Ok(())
    }
}

/// Elapsed share of a partner contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContractProgress {
    /// Percentage of the contract duration already elapsed (0-100).
    pub elapsed_percent: u8,
    /// Whole days left until the contract end date (0 once ended).
    pub days_remaining: i64,
    pub ended: bool,
}

/// Partner with everything it owns, as shown on the partner page.
#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerDetail {
    #[serde(flatten)]
    pub partner: Partner,
    pub projects: Vec<Project>,
    pub events: Vec<Event>,
    pub templates: Vec<ReportTemplate>,
    pub contract_progress: Option<ContractProgress>,
}
