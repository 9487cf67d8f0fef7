//! Permission resolution and role-template management.
//!
//! Resolution precedence for a membership, highest first:
//!   1. leader bypass (leaders hold every permission, no lookup)
//!   2. explicit override on the membership row (even an empty one)
//!   3. the group's role-default template
//!
//! Role-default lookups go through an in-memory cache; every template
//! write invalidates the affected entries.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    cache::{RolePermissionCache, RolePermissionKey},
    models::{GroupId, GroupMember, GroupRole, MemberId, Permission, PermissionId, PermissionSource},
    repository::{GroupMemberRepository, PermissionRepository, RolePermissionRepository},
    Error, Result,
};

#[derive(Clone)]
pub struct PermissionService {
    permission_repo: PermissionRepository,
    role_permission_repo: RolePermissionRepository,
    group_member_repo: GroupMemberRepository,
    cache: RolePermissionCache,
}

impl PermissionService {
    pub fn new(
        permission_repo: PermissionRepository,
        role_permission_repo: RolePermissionRepository,
        group_member_repo: GroupMemberRepository,
        cache: RolePermissionCache,
    ) -> Self {
        Self {
            permission_repo,
            role_permission_repo,
            group_member_repo,
            cache,
        }
    }

    /// The full permission catalog.
    pub async fn list_catalog(&self) -> Result<Vec<Permission>> {
        self.permission_repo.list_all().await
    }

    /// Resolve the effective permission slugs for a (group, role) pair.
    ///
    /// Leaders short-circuit to the entire catalog without touching the
    /// template table or the cache. Other roles read through the cache.
    pub async fn get_permissions_for_role(
        &self,
        group_id: &GroupId,
        role: GroupRole,
    ) -> Result<Arc<HashSet<String>>> {
        if role.is_leader() {
            return Ok(Arc::new(self.permission_repo.all_slugs().await?));
        }

        let key = RolePermissionKey::new(group_id.clone(), role);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let slugs = Arc::new(
            self.role_permission_repo
                .list_slugs_for_role(group_id, role)
                .await?,
        );
        self.cache.insert(key, slugs.clone()).await;

        Ok(slugs)
    }

    /// Check whether a membership grants one permission.
    ///
    /// A leader membership grants everything, including slugs outside the
    /// catalog. An explicit override is consulted without touching role
    /// defaults at all.
    pub async fn member_has_permission(
        &self,
        membership: &GroupMember,
        permission: &str,
    ) -> Result<bool> {
        if membership.role.is_leader() {
            return Ok(true);
        }

        match membership.permission_source() {
            PermissionSource::Override(slugs) => Ok(slugs.contains(permission)),
            PermissionSource::RoleDefault => {
                let defaults = self
                    .get_permissions_for_role(&membership.group_id, membership.role)
                    .await?;
                Ok(defaults.contains(permission))
            }
        }
    }

    pub async fn member_has_any_permission(
        &self,
        membership: &GroupMember,
        permissions: &[&str],
    ) -> Result<bool> {
        for permission in permissions {
            if self.member_has_permission(membership, permission).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub async fn member_has_all_permissions(
        &self,
        membership: &GroupMember,
        permissions: &[&str],
    ) -> Result<bool> {
        for permission in permissions {
            if !self.member_has_permission(membership, permission).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Authorize a member for one permission across all of their current
    /// memberships in the group. A member holding several roles passes if
    /// any of them grants the permission.
    pub async fn authorize(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
        permission: &str,
    ) -> Result<()> {
        let memberships = self
            .group_member_repo
            .list_current_for_member(group_id, member_id)
            .await?;

        if memberships.is_empty() {
            return Err(Error::Forbidden(
                "Not a current member of this group".to_string(),
            ));
        }

        for membership in &memberships {
            if self.member_has_permission(membership, permission).await? {
                return Ok(());
            }
        }

        tracing::debug!(
            group_id = %group_id,
            member_id = %member_id,
            permission,
            "Permission denied"
        );
        Err(Error::Forbidden(format!(
            "Missing permission: {permission}"
        )))
    }

    /// Replace the role-default template for (group, role) and invalidate
    /// the cached entry.
    pub async fn assign_permissions_to_role(
        &self,
        group_id: &GroupId,
        role: GroupRole,
        permission_ids: &[PermissionId],
    ) -> Result<()> {
        self.role_permission_repo
            .replace_for_role(group_id, role, permission_ids)
            .await?;
        self.cache.invalidate(group_id, role).await;

        tracing::info!(
            group_id = %group_id,
            role = %role,
            count = permission_ids.len(),
            "Role permission template replaced"
        );
        Ok(())
    }

    /// Remove a single permission from a role template and invalidate the
    /// cached entry. Returns false when the assignment did not exist.
    pub async fn remove_permission_from_role(
        &self,
        group_id: &GroupId,
        role: GroupRole,
        permission_id: &PermissionId,
    ) -> Result<bool> {
        let removed = self
            .role_permission_repo
            .remove(group_id, role, permission_id)
            .await?;
        if removed {
            self.cache.invalidate(group_id, role).await;
        }
        Ok(removed)
    }

    /// Seed the default templates for a newly created group, then drop any
    /// cached entries for the group.
    pub async fn initialize_default_role_permissions(&self, group_id: &GroupId) -> Result<()> {
        self.role_permission_repo.insert_defaults(group_id).await?;
        self.cache.invalidate_group(group_id);

        tracing::info!(group_id = %group_id, "Default role permission templates seeded");
        Ok(())
    }

    /// Replace a membership's explicit override. `None` restores role
    /// defaults. Overrides live on the membership row and are never cached,
    /// so no invalidation is needed.
    pub async fn set_member_permission_override(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
        role: GroupRole,
        permissions: Option<Vec<String>>,
    ) -> Result<GroupMember> {
        self.group_member_repo
            .set_permission_override(group_id, member_id, role, permissions.as_ref())
            .await
    }
}
