//! Database queries for reports.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, RelationTrait, Set,
};
use sea_orm::sea_query::JoinType;

use crate::entity::project;
use crate::entity::report::{self, ActiveModel, Entity as ReportEntity};
use crate::error::{AppError, AppResult};
use crate::models::{NewReport, Report, ReportFilter};

use super::DbPool;

impl DbPool {
    /// List reports matching the filter, ordered by deadline with undated
    /// reports last.
    pub async fn list_reports(&self, filter: &ReportFilter) -> AppResult<Vec<Report>> {
        let mut query = ReportEntity::find();

        if let Some(project_id) = filter.project_id {
            query = query.filter(report::Column::ProjectId.eq(project_id));
        }
        if let Some(partner_id) = filter.partner_id {
            query = query
                .join(JoinType::InnerJoin, report::Relation::Project.def())
                .filter(project::Column::PartnerId.eq(partner_id));
        }

        let rows = query
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list reports: {}", e)))?;

        // NULL ordering differs between engines, so sort here.
        let mut reports: Vec<Report> = rows.into_iter().map(Report::from_entity).collect();
        reports.sort_by_key(|r| (r.deadline.is_none(), r.deadline, r.id));
        Ok(reports)
    }

    /// Get a report by ID.
    pub async fn get_report(&self, id: i32) -> AppResult<Option<Report>> {
        let row = ReportEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get report: {}", e)))?;

        Ok(row.map(Report::from_entity))
    }

    /// Insert a new report.
    pub async fn insert_report(&self, new: &NewReport) -> AppResult<Report> {
        let model = ActiveModel {
            project_id: Set(new.project_id),
            title: Set(new.title.clone()),
            deadline: Set(new.deadline),
            submission_date: Set(new.submission_date),
            status: Set(new.status.as_str().to_string()),
            file_path: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let row = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert report: {}", e)))?;

        Ok(Report::from_entity(row))
    }

    /// Persist the mutable fields of a report.
    pub async fn update_report(&self, report: &Report) -> AppResult<Report> {
        let row = ReportEntity::find_by_id(report.id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get report: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Report {}", report.id)))?;

        let mut active: ActiveModel = row.into();
        active.status = Set(report.status.as_str().to_string());
        active.submission_date = Set(report.submission_date);
        active.file_path = Set(report.file_path.clone());

        let row = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update report: {}", e)))?;

        Ok(Report::from_entity(row))
    }

    /// Delete a report row, returning what was deleted.
    pub async fn delete_report(&self, id: i32) -> AppResult<Option<Report>> {
        let Some(existing) = self.get_report(id).await? else {
            return Ok(None);
        };

        let result = ReportEntity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete report: {}", e)))?;

        // A concurrent delete may have won the race.
        if result.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(existing))
    }
}
