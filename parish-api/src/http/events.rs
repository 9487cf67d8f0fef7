// Event and registration HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use parish_core::{
    models::{
        slugs, CreateEventRequest, CreateRegistrationRequest, EventId, EventRegistration,
        GroupEvent, GroupId, RegistrationId, RegistrationStatus,
    },
    service::EventSummary,
};

use super::{
    extract::ActingMember,
    response::{success, ApiResponse},
    AppError, AppResult, AppState,
};

/// Event response
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub registration_required: bool,
    pub registration_capacity: Option<i32>,
    pub registration_deadline: Option<String>,
    pub allow_guests: bool,
    pub max_guests_per_registration: i32,
    pub registration_count: i32,
    pub is_active: bool,
    pub registration_status: Option<&'static str>,
    pub available_spots: Option<i32>,
}

impl EventResponse {
    fn from_event(event: GroupEvent) -> Self {
        let available_spots = event.available_spots();
        Self {
            id: event.id.to_string(),
            group_id: event.group_id.to_string(),
            title: event.title,
            location: event.location,
            starts_at: event.starts_at.to_rfc3339(),
            ends_at: event.ends_at.map(|at| at.to_rfc3339()),
            registration_required: event.registration_required,
            registration_capacity: event.registration_capacity,
            registration_deadline: event.registration_deadline.map(|at| at.to_rfc3339()),
            allow_guests: event.allow_guests,
            max_guests_per_registration: event.max_guests_per_registration,
            registration_count: event.registration_count,
            is_active: event.is_active,
            registration_status: None,
            available_spots,
        }
    }

    fn from_summary(summary: EventSummary) -> Self {
        let status = summary.registration_status;
        let available_spots = summary.available_spots;
        let mut response = Self::from_event(summary.event);
        response.registration_status = Some(status);
        response.available_spots = available_spots;
        response
    }
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub id: String,
    pub event_id: String,
    pub member_id: Option<String>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub status: String,
    pub number_of_guests: i32,
    pub total_attendees: i32,
    pub registered_at: String,
    pub confirmed_at: Option<String>,
    pub cancelled_at: Option<String>,
}

impl From<EventRegistration> for RegistrationResponse {
    fn from(registration: EventRegistration) -> Self {
        let total_attendees = registration.total_attendees();
        Self {
            id: registration.id.to_string(),
            event_id: registration.event_id.to_string(),
            member_id: registration.member_id.map(|id| id.to_string()),
            guest_name: registration.guest_name,
            guest_email: registration.guest_email,
            guest_phone: registration.guest_phone,
            status: registration.status.to_string(),
            number_of_guests: registration.number_of_guests,
            total_attendees,
            registered_at: registration.registered_at.to_rfc3339(),
            confirmed_at: registration.confirmed_at.map(|at| at.to_rfc3339()),
            cancelled_at: registration.cancelled_at.map(|at| at.to_rfc3339()),
        }
    }
}

/// Registration status update request
#[derive(Debug, Deserialize)]
pub struct UpdateRegistrationStatusRequest {
    pub status: String,
}

/// Create a group event
pub async fn create_event(
    acting: ActingMember,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<Json<ApiResponse<EventResponse>>> {
    let group_id = GroupId::from_string(group_id);
    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::MANAGE_EVENTS)
        .await?;

    let event = state.event_service.create_event(&group_id, req).await?;
    Ok(success(EventResponse::from_event(event)))
}

/// Get an event with its derived registration status
pub async fn get_event(
    acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, event_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<EventResponse>>> {
    let group_id = GroupId::from_string(group_id);
    let event_id = EventId::from_string(event_id);

    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::VIEW_EVENTS)
        .await?;

    let summary = state.event_service.get_event(&group_id, &event_id).await?;
    Ok(success(EventResponse::from_summary(summary)))
}

/// Register for an event (member or guest)
pub async fn create_registration(
    _acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, event_id)): Path<(String, String)>,
    Json(req): Json<CreateRegistrationRequest>,
) -> AppResult<Json<ApiResponse<RegistrationResponse>>> {
    let group_id = GroupId::from_string(group_id);
    let event_id = EventId::from_string(event_id);

    let registration = state
        .registration_service
        .create_registration(&group_id, &event_id, req)
        .await?;

    Ok(success(registration.into()))
}

/// List an event's registrations
pub async fn list_registrations(
    acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, event_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Vec<RegistrationResponse>>>> {
    let group_id = GroupId::from_string(group_id);
    let event_id = EventId::from_string(event_id);

    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::VIEW_EVENTS)
        .await?;
    // Scope check: the event must belong to the group.
    state.event_service.get_event(&group_id, &event_id).await?;

    let registrations = state
        .registration_service
        .list_registrations(&event_id)
        .await?;
    Ok(success(registrations.into_iter().map(Into::into).collect()))
}

/// Update a registration's lifecycle status
pub async fn update_registration_status(
    acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, event_id, registration_id)): Path<(String, String, String)>,
    Json(req): Json<UpdateRegistrationStatusRequest>,
) -> AppResult<Json<ApiResponse<RegistrationResponse>>> {
    let group_id = GroupId::from_string(group_id);
    let event_id = EventId::from_string(event_id);
    let registration_id = RegistrationId::from_string(registration_id);

    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::MANAGE_EVENTS)
        .await?;
    state.event_service.get_event(&group_id, &event_id).await?;

    let status = RegistrationStatus::from_str(&req.status).map_err(AppError::unprocessable)?;

    let registration = state
        .registration_service
        .update_registration_status(&event_id, &registration_id, status)
        .await?;

    Ok(success(registration.into()))
}

/// Delete a registration
pub async fn delete_registration(
    acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, event_id, registration_id)): Path<(String, String, String)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let group_id = GroupId::from_string(group_id);
    let event_id = EventId::from_string(event_id);
    let registration_id = RegistrationId::from_string(registration_id);

    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::DELETE_EVENTS)
        .await?;
    state.event_service.get_event(&group_id, &event_id).await?;

    state
        .registration_service
        .delete_registration(&event_id, &registration_id)
        .await?;

    Ok(success(serde_json::json!({ "deleted": true })))
}

/// Expected headcount for an event
pub async fn get_headcount(
    acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, event_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let group_id = GroupId::from_string(group_id);
    let event_id = EventId::from_string(event_id);

    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::VIEW_EVENTS)
        .await?;
    state.event_service.get_event(&group_id, &event_id).await?;

    let headcount = state
        .registration_service
        .expected_headcount(&event_id)
        .await?;

    Ok(success(serde_json::json!({ "headcount": headcount })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parish_core::test_helpers::EventFixture;

    #[test]
    fn test_event_response_carries_available_spots() {
        let event = EventFixture::new()
            .with_title("Harvest Dinner")
            .with_capacity(40)
            .with_registration_count(15)
            .build();

        let response = EventResponse::from_event(event);

        assert_eq!(response.title, "Harvest Dinner");
        assert_eq!(response.registration_capacity, Some(40));
        assert_eq!(response.registration_count, 15);
        assert_eq!(response.available_spots, Some(25));
        assert_eq!(response.registration_status, None);
    }

    #[test]
    fn test_event_response_without_capacity() {
        let response = EventResponse::from_event(EventFixture::new().build());
        assert_eq!(response.available_spots, None);
    }
}
