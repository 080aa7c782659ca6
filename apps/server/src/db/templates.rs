//! Database queries for report templates.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::report_template::{self, ActiveModel, Entity as TemplateEntity};
use crate::error::{AppError, AppResult};
use crate::models::template::structure_to_json;
use crate::models::{CreateTemplateRequest, ReportTemplate};

use super::DbPool;

impl DbPool {
    /// List templates, newest first.
    pub async fn list_templates(&self, partner_id: Option<i32>) -> AppResult<Vec<ReportTemplate>> {
        let mut query = TemplateEntity::find();
        if let Some(partner_id) = partner_id {
            query = query.filter(report_template::Column::PartnerId.eq(partner_id));
        }

        let rows = query
            .order_by_desc(report_template::Column::CreatedAt)
            .order_by_desc(report_template::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list templates: {}", e)))?;

        Ok(rows.into_iter().map(ReportTemplate::from_entity).collect())
    }

    /// Insert a new template.
    pub async fn insert_template(&self, req: &CreateTemplateRequest) -> AppResult<ReportTemplate> {
        let content = &req.content;
        let model = ActiveModel {
            partner_id: Set(req.partner_id),
            title: Set(content.title.trim().to_string()),
            instructions: Set(content.instructions.clone()),
            structure: Set(structure_to_json(&content.structure)),
            requires_video: Set(content.requires_video),
            requires_audio: Set(content.requires_audio),
            requires_text: Set(content.requires_text),
            text_formats: Set(content.text_formats.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let row = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert template: {}", e)))?;

        Ok(ReportTemplate::from_entity(row))
    }
}
