//! Database queries for partners.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::entity::partner::{self, ActiveModel, Entity as PartnerEntity};
use crate::entity::{event, project, report, report_template};
use crate::error::{AppError, AppResult};
use crate::models::{CreatePartnerRequest, Partner};

use super::DbPool;

impl DbPool {
    /// List partners ordered by name.
    pub async fn list_partners(&self) -> AppResult<Vec<Partner>> {
        let rows = PartnerEntity::find()
            .order_by_asc(partner::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list partners: {}", e)))?;

        Ok(rows.into_iter().map(Partner::from_entity).collect())
    }

    /// Get a partner by ID.
    pub async fn get_partner(&self, id: i32) -> AppResult<Option<Partner>> {
        let row = PartnerEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get partner: {}", e)))?;

        Ok(row.map(Partner::from_entity))
    }

    /// Insert a new partner.
    pub async fn insert_partner(&self, req: &CreatePartnerRequest) -> AppResult<Partner> {
        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            contact_email: Set(req.contact_email.clone()),
            description: Set(req.description.clone()),
            country: Set(req.country.clone()),
            contract_start_date: Set(req.contract_start_date),
            contract_end_date: Set(req.contract_end_date),
            meeting_frequency: Set(req.meeting_frequency.as_str().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let row = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert partner: {}", e)))?;

        Ok(Partner::from_entity(row))
    }

    /// Delete a partner and everything it owns in one transaction.
    ///
    /// Returns the file paths of the removed reports so the caller can clean
    /// up storage once the transaction has committed.
    pub async fn delete_partner_cascade(&self, id: i32) -> AppResult<Option<Vec<String>>> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let exists = PartnerEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get partner: {}", e)))?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let project_ids: Vec<i32> = project::Entity::find()
            .select_only()
            .column(project::Column::Id)
            .filter(project::Column::PartnerId.eq(id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list partner projects: {}", e)))?;

        let mut file_paths = Vec::new();
        if !project_ids.is_empty() {
            let paths: Vec<Option<String>> = report::Entity::find()
                .select_only()
                .column(report::Column::FilePath)
                .filter(report::Column::ProjectId.is_in(project_ids.clone()))
                .into_tuple()
                .all(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to list report files: {}", e)))?;
            file_paths.extend(paths.into_iter().flatten());

            report::Entity::delete_many()
                .filter(report::Column::ProjectId.is_in(project_ids))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to delete reports: {}", e)))?;
        }

        project::Entity::delete_many()
            .filter(project::Column::PartnerId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete projects: {}", e)))?;

        event::Entity::delete_many()
            .filter(event::Column::PartnerId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete events: {}", e)))?;

        report_template::Entity::delete_many()
            .filter(report_template::Column::PartnerId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete templates: {}", e)))?;

        PartnerEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete partner: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit partner deletion: {}", e)))?;

        Ok(Some(file_paths))
    }
}
