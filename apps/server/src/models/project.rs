//! Project domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::entity::project;
use crate::error::{AppError, AppResult};

/// Project status enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }
}

/// One point of a project's progress history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EvolutionPoint {
    /// Month of the measurement, `YYYY-MM`.
    pub date: String,
    /// Completion percentage (0-100).
    #[serde(alias = "prog")]
    pub progress: u8,
}

impl EvolutionPoint {
    /// First day of the point's month, if `date` is a valid `YYYY-MM`.
    pub fn month(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&format!("{}-01", self.date.trim()), "%Y-%m-%d").ok()
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.month().is_none() {
            return Err(AppError::InvalidInput(format!(
                "evolution date '{}' must use the YYYY-MM format",
                self.date
            )));
        }
        if self.progress > 100 {
            return Err(AppError::InvalidInput(
                "progress must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

/// Insert a point into an evolution series, replacing any point for the same
/// month, and keep the series ordered by month.
pub fn record_point(series: &mut Vec<EvolutionPoint>, point: EvolutionPoint) {
    series.retain(|p| p.month() != point.month());
    series.push(point);
    series.sort_by_key(|p| p.month());
}

/// Decode a stored evolution series; malformed entries are dropped.
pub fn evolution_from_json(value: &JsonValue) -> Vec<EvolutionPoint> {
    match value {
        JsonValue::Array(items) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

pub fn evolution_to_json(series: &[EvolutionPoint]) -> JsonValue {
    serde_json::to_value(series).unwrap_or_else(|_| JsonValue::Array(Vec::new()))
}

/// A unit of work owned by a partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub id: i32,
    pub partner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub evolution_data: Vec<EvolutionPoint>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn from_entity(model: project::Model) -> Self {
        Self {
            id: model.id,
            partner_id: model.partner_id,
            title: model.title,
            description: model.description,
            status: ProjectStatus::parse(&model.status).unwrap_or_default(),
            evolution_data: evolution_from_json(&model.evolution_data),
            created_at: model.created_at,
        }
    }
}

/// Request body for creating a project.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub partner_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub evolution_data: Vec<EvolutionPoint>,
}

impl CreateProjectRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput("title is required".to_string()));
        }
        self.evolution_data.iter().try_for_each(EvolutionPoint::validate)
    }

    /// Evolution series as it will be stored: one point per month, ordered.
    pub fn normalized_evolution(&self) -> Vec<EvolutionPoint> {
        let mut series = Vec::with_capacity(self.evolution_data.len());
        for point in &self.evolution_data {
            record_point(&mut series, point.clone());
        }
        series
    }
}
