use sqlx::{postgres::PgRow, PgPool, Row};
use std::str::FromStr;

use crate::{
    models::{EventId, EventRegistration, MemberId, RegistrationId, RegistrationState, RegistrationStatus},
    transaction::with_transaction,
    Error, Result,
};

/// Event registration repository.
///
/// The denormalized `registration_count` on the event row is maintained
/// here, in the same transaction as the registration write. The insert
/// increments the counter conditionally (only while below capacity), which
/// makes the counter itself the capacity gate: two concurrent inserts for
/// the last spot serialize on the event row and exactly one wins.
#[derive(Clone)]
pub struct EventRegistrationRepository {
    pool: PgPool,
}

impl EventRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a registration and increment the event's live-registration
    /// counter atomically.
    ///
    /// The counter update is conditional on remaining capacity; when it
    /// matches no row the event is full (or was filled by a concurrent
    /// registration) and the whole transaction rolls back with
    /// [`Error::RegistrationClosed`].
    pub async fn create_with_counter(
        &self,
        registration: &EventRegistration,
    ) -> Result<EventRegistration> {
        let registration = registration.clone();

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let claimed = sqlx::query(
                    "UPDATE group_events
                     SET registration_count = registration_count + 1, updated_at = NOW()
                     WHERE id = $1
                       AND (registration_capacity IS NULL
                            OR registration_count < registration_capacity)",
                )
                .bind(registration.event_id.as_str())
                .execute(&mut **tx)
                .await?;

                if claimed.rows_affected() == 0 {
                    return Err(Error::RegistrationClosed {
                        reason: RegistrationState::ClosedCapacity.description().to_string(),
                    });
                }

                let row = sqlx::query(
                    "INSERT INTO event_registrations (
                        id, event_id, member_id, guest_name, guest_email, guest_phone,
                        status, number_of_guests, registered_at, confirmed_at, cancelled_at
                     )
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                     RETURNING
                        id, event_id, member_id, guest_name, guest_email, guest_phone,
                        status, number_of_guests, registered_at, confirmed_at, cancelled_at",
                )
                .bind(registration.id.as_str())
                .bind(registration.event_id.as_str())
                .bind(registration.member_id.as_ref().map(MemberId::as_str))
                .bind(&registration.guest_name)
                .bind(&registration.guest_email)
                .bind(&registration.guest_phone)
                .bind(registration.status.as_str())
                .bind(registration.number_of_guests)
                .bind(registration.registered_at)
                .bind(registration.confirmed_at)
                .bind(registration.cancelled_at)
                .fetch_one(&mut **tx)
                .await?;

                row_to_registration(&row)
            })
        })
        .await
    }

    /// Find a member's live (non-cancelled) registration for an event.
    pub async fn find_live_by_member(
        &self,
        event_id: &EventId,
        member_id: &MemberId,
    ) -> Result<Option<EventRegistration>> {
        let row = sqlx::query(
            "SELECT
                id, event_id, member_id, guest_name, guest_email, guest_phone,
                status, number_of_guests, registered_at, confirmed_at, cancelled_at
             FROM event_registrations
             WHERE event_id = $1 AND member_id = $2 AND status <> 'cancelled'",
        )
        .bind(event_id.as_str())
        .bind(member_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_registration).transpose()
    }

    /// Get a registration scoped to its event.
    pub async fn get_in_event(
        &self,
        event_id: &EventId,
        registration_id: &RegistrationId,
    ) -> Result<Option<EventRegistration>> {
        let row = sqlx::query(
            "SELECT
                id, event_id, member_id, guest_name, guest_email, guest_phone,
                status, number_of_guests, registered_at, confirmed_at, cancelled_at
             FROM event_registrations
             WHERE id = $1 AND event_id = $2",
        )
        .bind(registration_id.as_str())
        .bind(event_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_registration).transpose()
    }

    pub async fn list_by_event(&self, event_id: &EventId) -> Result<Vec<EventRegistration>> {
        let rows = sqlx::query(
            "SELECT
                id, event_id, member_id, guest_name, guest_email, guest_phone,
                status, number_of_guests, registered_at, confirmed_at, cancelled_at
             FROM event_registrations
             WHERE event_id = $1
             ORDER BY registered_at ASC",
        )
        .bind(event_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_registration).collect()
    }

    /// Move a registration to a non-cancelled status. Stamps
    /// `confirmed_at` on the first transition to confirmed.
    pub async fn set_status(
        &self,
        registration_id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<EventRegistration> {
        let row = sqlx::query(
            "UPDATE event_registrations
             SET status = $2,
                 confirmed_at = CASE
                    WHEN $2 = 'confirmed' AND confirmed_at IS NULL THEN NOW()
                    ELSE confirmed_at
                 END
             WHERE id = $1
             RETURNING
                id, event_id, member_id, guest_name, guest_email, guest_phone,
                status, number_of_guests, registered_at, confirmed_at, cancelled_at",
        )
        .bind(registration_id.as_str())
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row_to_registration(&row)
    }

    /// Cancel a registration and release its counted spot, atomically.
    ///
    /// Only a live registration matches the UPDATE, so double-cancelling
    /// cannot decrement twice. The decrement floors at zero to tolerate
    /// counters drifted by legacy data.
    pub async fn cancel_with_counter(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Option<EventRegistration>> {
        let registration_id = registration_id.clone();

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let row = sqlx::query(
                    "UPDATE event_registrations
                     SET status = 'cancelled', cancelled_at = NOW()
                     WHERE id = $1 AND status <> 'cancelled'
                     RETURNING
                        id, event_id, member_id, guest_name, guest_email, guest_phone,
                        status, number_of_guests, registered_at, confirmed_at, cancelled_at",
                )
                .bind(registration_id.as_str())
                .fetch_optional(&mut **tx)
                .await?;

                let Some(row) = row else {
                    return Ok(None);
                };
                let cancelled = row_to_registration(&row)?;

                sqlx::query(
                    "UPDATE group_events
                     SET registration_count = GREATEST(registration_count - 1, 0),
                         updated_at = NOW()
                     WHERE id = $1",
                )
                .bind(cancelled.event_id.as_str())
                .execute(&mut **tx)
                .await?;

                Ok(Some(cancelled))
            })
        })
        .await
    }

    /// Hard-delete a registration, releasing its counted spot unless it was
    /// already cancelled (its spot was released at cancellation time).
    pub async fn delete_with_counter(&self, registration_id: &RegistrationId) -> Result<bool> {
        let registration_id = registration_id.clone();

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let row = sqlx::query(
                    "DELETE FROM event_registrations
                     WHERE id = $1
                     RETURNING event_id, status",
                )
                .bind(registration_id.as_str())
                .fetch_optional(&mut **tx)
                .await?;

                let Some(row) = row else {
                    return Ok(false);
                };
                let event_id: EventId = row.try_get("event_id")?;
                let status: String = row.try_get("status")?;

                if status.trim_end() != "cancelled" {
                    sqlx::query(
                        "UPDATE group_events
                         SET registration_count = GREATEST(registration_count - 1, 0),
                             updated_at = NOW()
                         WHERE id = $1",
                    )
                    .bind(event_id.as_str())
                    .execute(&mut **tx)
                    .await?;
                }

                Ok(true)
            })
        })
        .await
    }

    /// Expected headcount: each live registration counts itself plus its
    /// accompanying guests.
    pub async fn headcount(&self, event_id: &EventId) -> Result<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(1 + number_of_guests)::bigint
             FROM event_registrations
             WHERE event_id = $1 AND status <> 'cancelled'",
        )
        .bind(event_id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}

fn row_to_registration(row: &PgRow) -> Result<EventRegistration> {
    let status: String = row.try_get("status")?;
    let status = RegistrationStatus::from_str(status.trim_end())
        .map_err(Error::InvalidInput)?;

    Ok(EventRegistration {
        id: row.try_get("id")?,
        event_id: row.try_get("event_id")?,
        member_id: row.try_get("member_id")?,
        guest_name: row.try_get("guest_name")?,
        guest_email: row.try_get("guest_email")?,
        guest_phone: row.try_get("guest_phone")?,
        status,
        number_of_guests: row.try_get("number_of_guests")?,
        registered_at: row.try_get("registered_at")?,
        confirmed_at: row.try_get("confirmed_at")?,
        cancelled_at: row.try_get("cancelled_at")?,
    })
}
