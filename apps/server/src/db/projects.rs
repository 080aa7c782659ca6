//! Database queries for projects.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::entity::project::{self, ActiveModel, Entity as ProjectEntity};
use crate::error::{AppError, AppResult};
use crate::config::DatabaseEngine;
use crate::models::project::evolution_to_json;
use crate::models::{record_point, CreateProjectRequest, EvolutionPoint, Project};

use super::DbPool;

impl DbPool {
    /// List projects, newest first.
    pub async fn list_projects(&self, partner_id: Option<i32>) -> AppResult<Vec<Project>> {
        let mut query = ProjectEntity::find();
        if let Some(partner_id) = partner_id {
            query = query.filter(project::Column::PartnerId.eq(partner_id));
        }

        let rows = query
            .order_by_desc(project::Column::CreatedAt)
            .order_by_desc(project::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list projects: {}", e)))?;

        Ok(rows.into_iter().map(Project::from_entity).collect())
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: i32) -> AppResult<Option<Project>> {
        let row = ProjectEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))?;

        Ok(row.map(Project::from_entity))
    }

    /// Insert a new project.
    pub async fn insert_project(&self, req: &CreateProjectRequest) -> AppResult<Project> {
        let model = ActiveModel {
            partner_id: Set(req.partner_id),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description.clone()),
            status: Set(req.status.unwrap_or_default().as_str().to_string()),
            evolution_data: Set(evolution_to_json(&req.normalized_evolution())),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let row = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert project: {}", e)))?;

        Ok(Project::from_entity(row))
    }

    /// Merge a point into a project's evolution series inside one
    /// transaction. On PostgreSQL the row is locked for the update; SQLite
    /// serializes writers on its own.
    pub async fn record_project_point(
        &self,
        id: i32,
        point: EvolutionPoint,
    ) -> AppResult<Option<Project>> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut query = ProjectEntity::find_by_id(id);
        if self.engine() == DatabaseEngine::Postgres {
            query = query.lock_exclusive();
        }
        let Some(row) = query
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))?
        else {
            return Ok(None);
        };

        let mut series = Project::from_entity(row.clone()).evolution_data;
        record_point(&mut series, point);

        let mut active: ActiveModel = row.into();
        active.evolution_data = Set(evolution_to_json(&series));

        let row = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update project: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(Some(Project::from_entity(row)))
    }
}
