//! Calendar event models: stored events and derived calendar items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::event;
use crate::error::{AppError, AppResult};

use super::dates::deserialize_timestamp;
use super::partner::MeetingFrequency;

/// Event type enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Meeting,
    Deadline,
    #[default]
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Deadline => "deadline",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "meeting" => Some(Self::Meeting),
            "deadline" => Some(Self::Deadline),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// A persisted calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: i32,
    /// `None` for organization-wide events.
    pub partner_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn from_entity(model: event::Model) -> Self {
        Self {
            id: model.id,
            partner_id: model.partner_id,
            title: model.title,
            description: model.description,
            event_date: model.event_date,
            event_type: EventType::parse(&model.event_type).unwrap_or_default(),
            created_at: model.created_at,
        }
    }
}

/// Request body for creating an event.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub partner_id: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub event_date: DateTime<Utc>,
    #[serde(default, rename = "type")]
    pub event_type: EventType,
}

impl CreateEventRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput("title is required".to_string()));
        }
        Ok(())
    }
}

/// Partner selection for the calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PartnerFilter {
    #[default]
    All,
    Partner(i32),
}

impl PartnerFilter {
    /// Parse `all`, an empty value, or a partner id.
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(Self::All),
            Some(s) => s.parse::<i32>().map(Self::Partner).map_err(|_| {
                AppError::InvalidInput(format!("partner_id must be 'all' or a number, got '{}'", s))
            }),
        }
    }

    pub fn matches(&self, partner_id: Option<i32>) -> bool {
        match self {
            Self::All => true,
            Self::Partner(id) => partner_id == Some(*id),
        }
    }

    pub fn partner_id(&self) -> Option<i32> {
        match self {
            Self::All => None,
            Self::Partner(id) => Some(*id),
        }
    }
}

/// Calendar query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CalendarQuery {
    /// `all` (default) or a partner id.
    #[serde(default, alias = "partnerId")]
    pub partner_id: Option<String>,
}

/// Where a calendar item comes from. Only `Stored` items exist in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarSource {
    Stored { event_id: i32 },
    DerivedFromDeadline { report_id: i32, project_id: i32 },
    DerivedFromRecurrence {
        frequency: MeetingFrequency,
        /// Position of the occurrence in the partner's meeting series.
        occurrence: u32,
    },
}

/// One entry of the unified calendar.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CalendarItem {
    /// Stable key, e.g. `event-3`, `report-12`, `meeting-1-2024-07-01`.
    pub key: String,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub partner_id: Option<i32>,
    pub partner_name: Option<String>,
    pub source: CalendarSource,
    /// Within the notification window around now.
    pub is_alert: bool,
}
