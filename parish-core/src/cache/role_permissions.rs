//! Role-default permission cache (in-memory Moka).
//!
//! Read-through and write-invalidate: the role-permission join table is the
//! source of truth, and every mutating operation invalidates the affected
//! entry before readers can observe the committed change. The cache may be
//! cleared at any time without correctness loss; cold lookups recompute
//! from the database.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{GroupId, GroupRole};

/// Typed cache key: one entry per (group, role) pair. Avoids ad hoc string
/// interpolation so invalidation can never miss a malformed key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RolePermissionKey {
    pub group_id: GroupId,
    pub role: GroupRole,
}

impl RolePermissionKey {
    pub fn new(group_id: GroupId, role: GroupRole) -> Self {
        Self { group_id, role }
    }
}

/// Cache of resolved permission-slug sets per (group, role).
#[derive(Clone)]
pub struct RolePermissionCache {
    inner: moka::future::Cache<RolePermissionKey, Arc<HashSet<String>>>,
}

impl RolePermissionCache {
    /// Create a cache with the given capacity and TTL.
    ///
    /// Invalidation closures are enabled to support group-wide eviction by
    /// key prefix (all roles of one group at once).
    #[must_use]
    pub fn new(max_capacity: u64, ttl_seconds: u64) -> Self {
        let inner = moka::future::Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .support_invalidation_closures()
            .build();

        Self { inner }
    }

    pub async fn get(&self, key: &RolePermissionKey) -> Option<Arc<HashSet<String>>> {
        let entry = self.inner.get(key).await;
        if entry.is_some() {
            tracing::debug!(group_id = %key.group_id, role = %key.role, "Role permission cache hit");
        }
        entry
    }

    pub async fn insert(&self, key: RolePermissionKey, permissions: Arc<HashSet<String>>) {
        self.inner.insert(key, permissions).await;
    }

    /// Invalidate a single (group, role) entry.
    pub async fn invalidate(&self, group_id: &GroupId, role: GroupRole) {
        let key = RolePermissionKey::new(group_id.clone(), role);
        self.inner.invalidate(&key).await;
        tracing::debug!(group_id = %group_id, role = %role, "Role permission cache invalidated");
    }

    /// Invalidate every role entry for one group.
    ///
    /// Used after bulk template writes (default seeding) where touching
    /// each role key individually would be easy to get wrong.
    pub fn invalidate_group(&self, group_id: &GroupId) {
        let group_id = group_id.clone();
        if let Err(e) = self
            .inner
            .invalidate_entries_if(move |key, _| key.group_id == group_id)
        {
            tracing::warn!("Failed to invalidate group permission cache: {e}");
        }
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

impl std::fmt::Debug for RolePermissionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RolePermissionCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug_set(slugs: &[&str]) -> Arc<HashSet<String>> {
        Arc::new(slugs.iter().map(|s| (*s).to_string()).collect())
    }

    #[tokio::test]
    async fn test_get_insert_invalidate() {
        let cache = RolePermissionCache::new(100, 300);
        let group_id = GroupId::new();
        let key = RolePermissionKey::new(group_id.clone(), GroupRole::Secretary);

        assert!(cache.get(&key).await.is_none());

        cache.insert(key.clone(), slug_set(&["view_members"])).await;
        let cached = cache.get(&key).await.expect("entry should be cached");
        assert!(cached.contains("view_members"));

        cache.invalidate(&group_id, GroupRole::Secretary).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_group_clears_all_roles() {
        let cache = RolePermissionCache::new(100, 300);
        let group_a = GroupId::new();
        let group_b = GroupId::new();

        let key_a1 = RolePermissionKey::new(group_a.clone(), GroupRole::Secretary);
        let key_a2 = RolePermissionKey::new(group_a.clone(), GroupRole::Treasurer);
        let key_b = RolePermissionKey::new(group_b.clone(), GroupRole::Secretary);

        cache.insert(key_a1.clone(), slug_set(&["view_members"])).await;
        cache.insert(key_a2.clone(), slug_set(&["view_finances"])).await;
        cache.insert(key_b.clone(), slug_set(&["view_members"])).await;

        cache.invalidate_group(&group_a);
        // Predicate-based invalidation applies lazily; run the pending task.
        cache.inner.run_pending_tasks().await;

        assert!(cache.get(&key_a1).await.is_none());
        assert!(cache.get(&key_a2).await.is_none());
        assert!(cache.get(&key_b).await.is_some());
    }
}
