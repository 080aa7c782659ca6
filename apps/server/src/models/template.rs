//! Report template models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

use crate::entity::report_template;
use crate::error::{AppError, AppResult};

/// One section partners must fill in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TemplateSection {
    pub section: String,
    #[serde(default)]
    pub details: String,
}

pub fn structure_from_json(value: &JsonValue) -> Vec<TemplateSection> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

pub fn structure_to_json(structure: &[TemplateSection]) -> JsonValue {
    serde_json::to_value(structure).unwrap_or_else(|_| JsonValue::Array(Vec::new()))
}

/// Template content, either written by hand or produced by the AI gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GeneratedTemplate {
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub structure: Vec<TemplateSection>,
    #[serde(default)]
    pub requires_video: bool,
    #[serde(default)]
    pub requires_audio: bool,
    #[serde(default = "default_requires_text")]
    pub requires_text: bool,
    #[serde(default)]
    pub text_formats: String,
}

fn default_requires_text() -> bool {
    true
}

/// A reporting template applied to a partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportTemplate {
    pub id: i32,
    pub partner_id: i32,
    pub title: String,
    pub instructions: String,
    pub structure: Vec<TemplateSection>,
    pub requires_video: bool,
    pub requires_audio: bool,
    pub requires_text: bool,
    pub text_formats: String,
    pub created_at: DateTime<Utc>,
}

impl ReportTemplate {
    pub fn from_entity(model: report_template::Model) -> Self {
        Self {
            id: model.id,
            partner_id: model.partner_id,
            title: model.title,
            instructions: model.instructions,
            structure: structure_from_json(&model.structure),
            requires_video: model.requires_video,
            requires_audio: model.requires_audio,
            requires_text: model.requires_text,
            text_formats: model.text_formats,
            created_at: model.created_at,
        }
    }
}

/// Request body for saving a template for a partner.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTemplateRequest {
    pub partner_id: i32,
    #[serde(flatten)]
    pub content: GeneratedTemplate,
}

impl CreateTemplateRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.content.title.trim().is_empty() {
            return Err(AppError::InvalidInput("title is required".to_string()));
        }
        if self
            .content
            .structure
            .iter()
            .any(|s| s.section.trim().is_empty())
        {
            return Err(AppError::InvalidInput(
                "every structure entry needs a section name".to_string(),
            ));
        }
        Ok(())
    }
}

/// Template filters for listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListTemplatesQuery {
    #[serde(default, rename = "partnerId", alias = "partner_id")]
    pub partner_id: Option<i32>,
}

/// Template as listed, with its partner's name.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TemplateView {
    #[serde(flatten)]
    pub template: ReportTemplate,
    pub partner_name: Option<String>,
}
