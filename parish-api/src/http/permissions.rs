// Permission catalog and role-template HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use parish_core::models::{slugs, GroupId, Permission, PermissionId};

use super::{
    extract::ActingMember,
    groups::parse_role,
    response::{success, ApiResponse},
    AppResult, AppState,
};

/// Permission catalog entry response
#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub category: String,
}

impl From<Permission> for PermissionResponse {
    fn from(permission: Permission) -> Self {
        Self {
            id: permission.id.to_string(),
            slug: permission.slug,
            name: permission.name,
            category: permission.category,
        }
    }
}

/// Role template replacement request. The new set fully replaces the old.
#[derive(Debug, Deserialize)]
pub struct AssignRolePermissionsRequest {
    pub permission_ids: Vec<String>,
}

/// Resolved role permissions response
#[derive(Debug, Serialize)]
pub struct RolePermissionsResponse {
    pub role: String,
    pub permissions: Vec<String>,
}

/// List the permission catalog
pub async fn list_catalog(
    _acting: ActingMember,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PermissionResponse>>>> {
    let catalog = state.permission_service.list_catalog().await?;
    Ok(success(catalog.into_iter().map(Into::into).collect()))
}

/// Resolve the effective permissions for a role in a group
pub async fn get_role_permissions(
    acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, role)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<RolePermissionsResponse>>> {
    let group_id = GroupId::from_string(group_id);
    let role = parse_role(&role)?;

    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::MANAGE_ROLES)
        .await?;

    let resolved = state
        .permission_service
        .get_permissions_for_role(&group_id, role)
        .await?;

    let mut permissions: Vec<String> = resolved.iter().cloned().collect();
    permissions.sort();

    Ok(success(RolePermissionsResponse {
        role: role.to_string(),
        permissions,
    }))
}

/// Replace the role-default permission template
pub async fn assign_role_permissions(
    acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, role)): Path<(String, String)>,
    Json(req): Json<AssignRolePermissionsRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let group_id = GroupId::from_string(group_id);
    let role = parse_role(&role)?;

    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::MANAGE_ROLES)
        .await?;

    let permission_ids: Vec<PermissionId> = req
        .permission_ids
        .into_iter()
        .map(PermissionId::from_string)
        .collect();

    state
        .permission_service
        .assign_permissions_to_role(&group_id, role, &permission_ids)
        .await?;

    Ok(success(serde_json::json!({
        "role": role.to_string(),
        "assigned": permission_ids.len(),
    })))
}

/// Remove a single permission from a role template
pub async fn remove_role_permission(
    acting: ActingMember,
    State(state): State<AppState>,
    Path((group_id, role, permission_id)): Path<(String, String, String)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let group_id = GroupId::from_string(group_id);
    let role = parse_role(&role)?;
    let permission_id = PermissionId::from_string(permission_id);

    state
        .permission_service
        .authorize(&group_id, &acting.member_id, slugs::MANAGE_ROLES)
        .await?;

    let removed = state
        .permission_service
        .remove_permission_from_role(&group_id, role, &permission_id)
        .await?;

    Ok(success(serde_json::json!({ "removed": removed })))
}
