//! Database queries for stored calendar events.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::event::{self, ActiveModel, Entity as EventEntity};
use crate::error::{AppError, AppResult};
use crate::models::{CreateEventRequest, Event, PartnerFilter};

use super::DbPool;

impl DbPool {
    /// List stored events ordered by date.
    pub async fn list_events(&self, filter: PartnerFilter) -> AppResult<Vec<Event>> {
        let mut query = EventEntity::find();
        if let Some(partner_id) = filter.partner_id() {
            query = query.filter(event::Column::PartnerId.eq(partner_id));
        }

        let rows = query
            .order_by_asc(event::Column::EventDate)
            .order_by_asc(event::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list events: {}", e)))?;

        Ok(rows.into_iter().map(Event::from_entity).collect())
    }

    /// Insert a new event.
    pub async fn insert_event(&self, req: &CreateEventRequest) -> AppResult<Event> {
        let model = ActiveModel {
            partner_id: Set(req.partner_id),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description.clone()),
            event_date: Set(req.event_date),
            event_type: Set(req.event_type.as_str().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let row = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert event: {}", e)))?;

        Ok(Event::from_entity(row))
    }
}
