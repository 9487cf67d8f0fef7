use sqlx::{postgres::PgRow, PgPool, Row};

use crate::{
    models::{EventId, GroupEvent, GroupId},
    Result,
};

/// Group event repository for database operations
#[derive(Clone)]
pub struct GroupEventRepository {
    pool: PgPool,
}

impl GroupEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, event: &GroupEvent) -> Result<GroupEvent> {
        let row = sqlx::query(
            "INSERT INTO group_events (
                id, group_id, title, location, starts_at, ends_at,
                registration_required, registration_capacity, registration_deadline,
                allow_guests, max_guests_per_registration, registration_count,
                is_active, created_at, updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING
                id, group_id, title, location, starts_at, ends_at,
                registration_required, registration_capacity, registration_deadline,
                allow_guests, max_guests_per_registration, registration_count,
                is_active, created_at, updated_at",
        )
        .bind(event.id.as_str())
        .bind(event.group_id.as_str())
        .bind(&event.title)
        .bind(&event.location)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(event.registration_required)
        .bind(event.registration_capacity)
        .bind(event.registration_deadline)
        .bind(event.allow_guests)
        .bind(event.max_guests_per_registration)
        .bind(event.registration_count)
        .bind(event.is_active)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row_to_event(&row)
    }

    pub async fn get_by_id(&self, event_id: &EventId) -> Result<Option<GroupEvent>> {
        let row = sqlx::query(
            "SELECT
                id, group_id, title, location, starts_at, ends_at,
                registration_required, registration_capacity, registration_deadline,
                allow_guests, max_guests_per_registration, registration_count,
                is_active, created_at, updated_at
             FROM group_events
             WHERE id = $1",
        )
        .bind(event_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_event).transpose()
    }

    /// Get an event scoped to its group; an event id from a different group
    /// resolves to `None`.
    pub async fn get_in_group(
        &self,
        group_id: &GroupId,
        event_id: &EventId,
    ) -> Result<Option<GroupEvent>> {
        let row = sqlx::query(
            "SELECT
                id, group_id, title, location, starts_at, ends_at,
                registration_required, registration_capacity, registration_deadline,
                allow_guests, max_guests_per_registration, registration_count,
                is_active, created_at, updated_at
             FROM group_events
             WHERE id = $1 AND group_id = $2",
        )
        .bind(event_id.as_str())
        .bind(group_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_event).transpose()
    }
}

pub(crate) fn row_to_event(row: &PgRow) -> Result<GroupEvent> {
    Ok(GroupEvent {
        id: row.try_get("id")?,
        group_id: row.try_get("group_id")?,
        title: row.try_get("title")?,
        location: row.try_get("location")?,
        starts_at: row.try_get("starts_at")?,
        ends_at: row.try_get("ends_at")?,
        registration_required: row.try_get("registration_required")?,
        registration_capacity: row.try_get("registration_capacity")?,
        registration_deadline: row.try_get("registration_deadline")?,
        allow_guests: row.try_get("allow_guests")?,
        max_guests_per_registration: row.try_get("max_guests_per_registration")?,
        registration_count: row.try_get("registration_count")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
