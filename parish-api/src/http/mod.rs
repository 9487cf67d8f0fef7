// Module: http
// HTTP/JSON REST API over the group, permission, and registration services

pub mod error;
pub mod events;
pub mod extract;
pub mod groups;
pub mod health;
pub mod permissions;
pub mod response;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;

use parish_core::service::{
    EventService, GroupService, MemberService, PermissionService, RegistrationService,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};
pub use extract::ActingMember;
pub use response::{success, ApiResponse};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub group_service: Arc<GroupService>,
    pub member_service: Arc<MemberService>,
    pub event_service: Arc<EventService>,
    pub registration_service: Arc<RegistrationService>,
    pub permission_service: Arc<PermissionService>,
}

/// Create the HTTP router with all routes
pub fn create_router(
    group_service: Arc<GroupService>,
    member_service: Arc<MemberService>,
    event_service: Arc<EventService>,
    registration_service: Arc<RegistrationService>,
    permission_service: Arc<PermissionService>,
) -> Router {
    let state = AppState {
        group_service,
        member_service,
        event_service,
        registration_service,
        permission_service,
    };

    let api = Router::new()
        // Directory
        .route("/members", post(groups::create_member))
        // Groups
        .route("/groups", post(groups::create_group))
        .route("/groups/{group_id}", get(groups::get_group))
        // Memberships
        .route(
            "/groups/{group_id}/members",
            post(groups::add_group_member).get(groups::list_group_members),
        )
        .route(
            "/groups/{group_id}/members/{member_id}/{role}",
            delete(groups::end_group_membership),
        )
        .route(
            "/groups/{group_id}/members/{member_id}/{role}/permissions",
            put(groups::set_permission_override),
        )
        // Permission catalog and role templates
        .route("/permissions", get(permissions::list_catalog))
        .route(
            "/groups/{group_id}/roles/{role}/permissions",
            get(permissions::get_role_permissions).put(permissions::assign_role_permissions),
        )
        .route(
            "/groups/{group_id}/roles/{role}/permissions/{permission_id}",
            delete(permissions::remove_role_permission),
        )
        // Events
        .route("/groups/{group_id}/events", post(events::create_event))
        .route(
            "/groups/{group_id}/events/{event_id}",
            get(events::get_event),
        )
        // Registrations
        .route(
            "/groups/{group_id}/events/{event_id}/registrations",
            post(events::create_registration).get(events::list_registrations),
        )
        .route(
            "/groups/{group_id}/events/{event_id}/registrations/{registration_id}",
            patch(events::update_registration_status).delete(events::delete_registration),
        )
        .route(
            "/groups/{group_id}/events/{event_id}/headcount",
            get(events::get_headcount),
        );

    Router::new()
        .merge(health::create_health_router())
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
