use std::collections::HashSet;

use sqlx::{postgres::PgRow, PgPool, Row};

use crate::{
    models::{GroupId, GroupRole, Permission, PermissionId},
    transaction::with_transaction,
    Result,
};

/// Permission catalog repository. The catalog is immutable reference data;
/// only reads are exposed.
#[derive(Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Permission>> {
        let rows = sqlx::query(
            "SELECT id, slug, name, category
             FROM group_permissions
             ORDER BY category, slug",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_permission).collect()
    }

    /// Every slug in the catalog (the leader's effective set).
    pub async fn all_slugs(&self) -> Result<HashSet<String>> {
        let slugs: Vec<String> = sqlx::query_scalar("SELECT slug FROM group_permissions")
            .fetch_all(&self.pool)
            .await?;

        Ok(slugs.into_iter().collect())
    }
}

/// Role-default permission template repository.
///
/// Rows map (group, role) to catalog permissions. Template writes are
/// transactional; callers invalidate the role-permission cache after a
/// successful write.
#[derive(Clone)]
pub struct RolePermissionRepository {
    pool: PgPool,
}

impl RolePermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the configured slugs for a (group, role) pair. Empty when
    /// nothing is configured.
    pub async fn list_slugs_for_role(
        &self,
        group_id: &GroupId,
        role: GroupRole,
    ) -> Result<HashSet<String>> {
        let slugs: Vec<String> = sqlx::query_scalar(
            "SELECT gp.slug
             FROM group_role_permissions grp
             JOIN group_permissions gp ON grp.permission_id = gp.id
             WHERE grp.group_id = $1 AND grp.role = $2",
        )
        .bind(group_id.as_str())
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(slugs.into_iter().collect())
    }

    /// Atomically replace the template for (group, role): delete all
    /// existing rows, insert the new set. The new set fully replaces the
    /// old; there is deliberately no diff-based update.
    pub async fn replace_for_role(
        &self,
        group_id: &GroupId,
        role: GroupRole,
        permission_ids: &[PermissionId],
    ) -> Result<()> {
        let group_id = group_id.clone();
        let ids: Vec<String> = permission_ids.iter().map(|p| p.0.clone()).collect();

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                sqlx::query(
                    "DELETE FROM group_role_permissions
                     WHERE group_id = $1 AND role = $2",
                )
                .bind(group_id.as_str())
                .bind(role)
                .execute(&mut **tx)
                .await?;

                if !ids.is_empty() {
                    sqlx::query(
                        "INSERT INTO group_role_permissions (group_id, role, permission_id)
                         SELECT $1, $2, unnest($3::text[])",
                    )
                    .bind(group_id.as_str())
                    .bind(role)
                    .bind(&ids)
                    .execute(&mut **tx)
                    .await?;
                }

                Ok(())
            })
        })
        .await
    }

    /// Remove a single permission from a role template.
    pub async fn remove(
        &self,
        group_id: &GroupId,
        role: GroupRole,
        permission_id: &PermissionId,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM group_role_permissions
             WHERE group_id = $1 AND role = $2 AND permission_id = $3",
        )
        .bind(group_id.as_str())
        .bind(role)
        .bind(permission_id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Seed the default role templates for a newly created group, all in
    /// one transaction.
    ///
    /// Deliberately does not dedupe against pre-existing rows: calling this
    /// twice for the same group violates the primary key and the whole
    /// seeding rolls back, surfaced to the caller as a conflict.
    pub async fn insert_defaults(&self, group_id: &GroupId) -> Result<()> {
        let group_id = group_id.clone();

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                for role in GroupRole::ALL {
                    let template: Vec<String> = role
                        .default_template()
                        .into_iter()
                        .map(str::to_string)
                        .collect();
                    if template.is_empty() {
                        continue;
                    }

                    sqlx::query(
                        "INSERT INTO group_role_permissions (group_id, role, permission_id)
                         SELECT $1, $2, id FROM group_permissions WHERE slug = ANY($3)",
                    )
                    .bind(group_id.as_str())
                    .bind(role)
                    .bind(&template)
                    .execute(&mut **tx)
                    .await?;
                }

                Ok(())
            })
        })
        .await
    }
}

fn row_to_permission(row: &PgRow) -> Result<Permission> {
    Ok(Permission {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
    })
}
