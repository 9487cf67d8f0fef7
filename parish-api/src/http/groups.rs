// Group and membership HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use parish_core::models::{
    slugs, AddGroupMemberRequest, CreateGroupRequest, Group, GroupId, GroupMember, GroupRole,
    MemberId,
};

use super::{
    extract::ActingMember,
    response::{success, ApiResponse},
    AppError, AppResult, AppState,
};

/// Group response
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    pub group_type: String,
    pub parent_id: Option<String>,
    pub leader_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id.to_string(),
            name: group.name,
            group_type: group.group_type,
            parent_id: group.parent_id.map(|id| id.to_string()),
            leader_id: group.leader_id.map(|id| id.to_string()),
            is_active: group.is_active,
            created_at: group.created_at.to_rfc3339(),
        }
    }
}

/// Membership response
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub group_id: String,
    pub member_id: String,
    pub role: String,
    pub custom_role_title: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_active: bool,
    pub join_date: String,
    pub exit_date: Option<String>,
}

impl From<GroupMember> for MembershipResponse {
    fn from(membership: GroupMember) -> Self {
        Self {
            group_id: membership.group_id.to_string(),
            member_id: membership.member_id.to_string(),
            role: membership.role.to_string(),
            custom_role_title: membership.custom_role_title,
            permissions: membership.permissions,
            is_active: membership.is_active,
            join_date: membership.join_date.to_rfc3339(),
            exit_date: membership.exit_date.map(|date| date.to_rfc3339()),
        }
    }
}

/// Permission override request. `permissions: null` restores role defaults.
#[derive(Debug, Deserialize)]
pub struct SetPermissionOverrideRequest {
    pub permissions: Option<Vec<String>>,
}

/// Create member (directory) request
#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Member response
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
}

pub(super) fn parse_role(role: &str) -> Result<GroupRole, AppError> {
    GroupRole::from_str(role).map_err(AppError::bad_request)
}

/// Create a new group
pub async fn create_group(
    _acting: ActingMember,
    State(state): State<AppState>,
    Json(req): Json<CreateGroupRequest>,
) -> AppResult<Json<ApiResponse<GroupResponse>>> {
    let group = state.group_service.create_group(req).await?;
    Ok(success(group.into()))
}

/// Get group information
pub async fn get_group(
    _acting: ActingMember,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<Json<ApiResponse<GroupResponse>>> {
    let group_id = GroupId::from_string(group_id);
    let group = state.group_service.get_group(&group_id).await?;
    Ok(success(group.into()))
}

/// Add a member to the congregation directory
pub async fn create_member(
    _acting: ActingMember,
    State(state): State<AppState>,
    Json(req): Json<CreateMemberRequest>,
) -> AppResult<Json<ApiResponse<MemberResponse>>> {
    let member = state
        .member_service
        .create_member(req.full_name, req.email, req.phone)
        .await?;

    Ok(success(MemberResponse {
        id: member.id.to_string(),
        full_name: member.full_name,
        email: member.email,
        phone: member.phone,
        created_at: member.created_at.to_rfc3339(),
    }))
}

/// Add a member to a group with a role
pub async fn add_group_member(
    acting: ActingMember,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(req): Json<AddGroupMemberRequest>,
) -> AppResult<Json<ApiResponse<MembershipResponse>>> {
    let group_id = GroupId::from_string(group_id);
    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::MANAGE_MEMBERS)
        .await?;

    let membership = state.member_service.add_group_member(&group_id, req).await?;
    Ok(success(membership.into()))
}

/// List a group's current members
pub async fn list_group_members(
    acting: ActingMember,
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<MembershipResponse>>>> {
    let group_id = GroupId::from_string(group_id);
    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::VIEW_MEMBERS)
        .await?;

    let members = state.member_service.list_group_members(&group_id).await?;
    Ok(success(members.into_iter().map(Into::into).collect()))
}

/// End a group membership
pub async fn end_group_membership(
    acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, member_id, role)): Path<(String, String, String)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let group_id = GroupId::from_string(group_id);
    let member_id = MemberId::from_string(member_id);
    let role = parse_role(&role)?;

    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::REMOVE_MEMBERS)
        .await?;

    state
        .member_service
        .end_membership(&group_id, &member_id, role)
        .await?;

    Ok(success(serde_json::json!({ "ended": true })))
}

/// Replace a membership's explicit permission override
pub async fn set_permission_override(
    acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, member_id, role)): Path<(String, String, String)>,
    Json(req): Json<SetPermissionOverrideRequest>,
) -> AppResult<Json<ApiResponse<MembershipResponse>>> {
    let group_id = GroupId::from_string(group_id);
    let member_id = MemberId::from_string(member_id);
    let role = parse_role(&role)?;

    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::MANAGE_ROLES)
        .await?;

    let membership = state
        .permission_service
        .set_member_permission_override(&group_id, &member_id, role, req.permissions)
        .await?;

    Ok(success(membership.into()))
}
