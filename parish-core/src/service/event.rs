use chrono::Utc;
use serde::Serialize;

use crate::{
    models::{CreateEventRequest, EventId, GroupEvent, GroupId, RegistrationState},
    repository::{GroupEventRepository, GroupRepository},
    Error, Result,
};

/// An event together with its derived registration status.
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: GroupEvent,
    pub registration_state: RegistrationState,
    pub registration_status: &'static str,
    pub available_spots: Option<i32>,
}

impl EventSummary {
    fn derive(event: GroupEvent) -> Self {
        let state = event.registration_state(Utc::now());
        let available_spots = event.available_spots();
        Self {
            registration_state: state,
            registration_status: state.description(),
            available_spots,
            event,
        }
    }
}

/// Group event management.
#[derive(Clone)]
pub struct EventService {
    group_repo: GroupRepository,
    event_repo: GroupEventRepository,
}

impl EventService {
    pub fn new(group_repo: GroupRepository, event_repo: GroupEventRepository) -> Self {
        Self {
            group_repo,
            event_repo,
        }
    }

    pub async fn create_event(
        &self,
        group_id: &GroupId,
        request: CreateEventRequest,
    ) -> Result<GroupEvent> {
        if !self.group_repo.exists(group_id).await? {
            return Err(Error::NotFound("Group not found".to_string()));
        }
        if request.title.trim().is_empty() {
            return Err(Error::InvalidInput("Event title is required".to_string()));
        }
        if matches!(request.registration_capacity, Some(capacity) if capacity <= 0) {
            return Err(Error::InvalidInput(
                "Registration capacity must be positive".to_string(),
            ));
        }
        if request.max_guests_per_registration < 0 {
            return Err(Error::InvalidInput(
                "Guest limit cannot be negative".to_string(),
            ));
        }

        let now = Utc::now();
        let event = GroupEvent {
            id: EventId::new(),
            group_id: group_id.clone(),
            title: request.title,
            location: request.location,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            registration_required: request.registration_required,
            registration_capacity: request.registration_capacity,
            registration_deadline: request.registration_deadline,
            allow_guests: request.allow_guests,
            max_guests_per_registration: request.max_guests_per_registration,
            registration_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created = self.event_repo.create(&event).await?;
        tracing::info!(group_id = %group_id, event_id = %created.id, "Event created");
        Ok(created)
    }

    /// Fetch an event in its group, with the registration status derived
    /// against the current time.
    pub async fn get_event(&self, group_id: &GroupId, event_id: &EventId) -> Result<EventSummary> {
        let event = self
            .event_repo
            .get_in_group(group_id, event_id)
            .await?
            .ok_or_else(|| Error::NotFound("Event not found".to_string()))?;

        Ok(EventSummary::derive(event))
    }
}
