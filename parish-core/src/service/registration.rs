//! Event registration lifecycle.
//!
//! Creation runs an ordered gauntlet: event existence, registration state
//! (inactive beats deadline beats capacity), duplicate member check, guest
//! policy. The capacity check repeats inside the insert transaction as a
//! conditional counter increment, so two racing registrations for the last
//! spot cannot both succeed.

use chrono::Utc;

use crate::{
    models::{
        CreateRegistrationRequest, EventId, EventRegistration, GroupEvent, GroupId, Registrant,
        RegistrationId, RegistrationStatus,
    },
    repository::{EventRegistrationRepository, GroupEventRepository},
    Error, Result,
};

#[derive(Clone)]
pub struct RegistrationService {
    event_repo: GroupEventRepository,
    registration_repo: EventRegistrationRepository,
}

impl RegistrationService {
    pub fn new(
        event_repo: GroupEventRepository,
        registration_repo: EventRegistrationRepository,
    ) -> Self {
        Self {
            event_repo,
            registration_repo,
        }
    }

    /// Register a member or guest for an event.
    pub async fn create_registration(
        &self,
        group_id: &GroupId,
        event_id: &EventId,
        request: CreateRegistrationRequest,
    ) -> Result<EventRegistration> {
        let event = self
            .event_repo
            .get_in_group(group_id, event_id)
            .await?
            .ok_or_else(|| Error::NotFound("Event not found".to_string()))?;

        let state = event.registration_state(Utc::now());
        if !state.is_open() {
            return Err(Error::RegistrationClosed {
                reason: state.description().to_string(),
            });
        }

        let registrant = request.registrant().map_err(Error::InvalidInput)?;

        if let Registrant::Member(member_id) = &registrant {
            if let Some(existing) = self
                .registration_repo
                .find_live_by_member(event_id, member_id)
                .await?
            {
                return Err(Error::DuplicateRegistration {
                    registration_id: existing.id,
                });
            }
        }

        Self::check_guest_policy(&event, request.number_of_guests)?;

        let registration =
            EventRegistration::new(event.id.clone(), registrant, request.number_of_guests);

        // The insert re-checks capacity atomically; a racing duplicate
        // member insert trips the partial unique index instead.
        let created = self
            .registration_repo
            .create_with_counter(&registration)
            .await?;

        tracing::info!(
            event_id = %created.event_id,
            registration_id = %created.id,
            attendees = created.total_attendees(),
            "Registration created"
        );
        Ok(created)
    }

    /// Validate a registration's guest count against the event's guest
    /// policy. A max of 0 means no per-registration cap.
    pub fn check_guest_policy(event: &GroupEvent, number_of_guests: i32) -> Result<()> {
        if number_of_guests < 0 {
            return Err(Error::InvalidInput(
                "Guest count cannot be negative".to_string(),
            ));
        }
        if number_of_guests > 0 {
            if !event.allow_guests {
                return Err(Error::GuestsNotAllowed);
            }
            if event.max_guests_per_registration > 0
                && number_of_guests > event.max_guests_per_registration
            {
                return Err(Error::GuestLimitExceeded {
                    max: event.max_guests_per_registration,
                });
            }
        }
        Ok(())
    }

    /// Move a registration between lifecycle statuses.
    ///
    /// Cancellation releases the counted spot in the same transaction.
    /// Cancelled is terminal: no transition out of it is allowed, and
    /// cancelling twice is rejected rather than double-decrementing.
    pub async fn update_registration_status(
        &self,
        event_id: &EventId,
        registration_id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<EventRegistration> {
        let current = self
            .registration_repo
            .get_in_event(event_id, registration_id)
            .await?
            .ok_or_else(|| Error::NotFound("Registration not found".to_string()))?;

        if current.is_cancelled() {
            return Err(Error::InvalidInput(
                "Cancelled registrations cannot change status".to_string(),
            ));
        }

        if status == RegistrationStatus::Cancelled {
            return self
                .registration_repo
                .cancel_with_counter(registration_id)
                .await?
                .ok_or_else(|| {
                    Error::InvalidInput("Registration is already cancelled".to_string())
                });
        }

        self.registration_repo
            .set_status(registration_id, status)
            .await
    }

    /// Hard-delete a registration, releasing its spot if it was still live.
    pub async fn delete_registration(
        &self,
        event_id: &EventId,
        registration_id: &RegistrationId,
    ) -> Result<()> {
        // Scope check before the delete so a registration id from another
        // event reads as not found.
        self.registration_repo
            .get_in_event(event_id, registration_id)
            .await?
            .ok_or_else(|| Error::NotFound("Registration not found".to_string()))?;

        let deleted = self
            .registration_repo
            .delete_with_counter(registration_id)
            .await?;
        if !deleted {
            return Err(Error::NotFound("Registration not found".to_string()));
        }

        tracing::info!(
            event_id = %event_id,
            registration_id = %registration_id,
            "Registration deleted"
        );
        Ok(())
    }

    pub async fn list_registrations(&self, event_id: &EventId) -> Result<Vec<EventRegistration>> {
        self.registration_repo.list_by_event(event_id).await
    }

    /// Expected headcount: every live registration counts its registrant
    /// plus accompanying guests.
    pub async fn expected_headcount(&self, event_id: &EventId) -> Result<i64> {
        self.registration_repo.headcount(event_id).await
    }
}
