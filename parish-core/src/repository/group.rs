use sqlx::{postgres::PgRow, PgPool, Row};

use crate::{
    models::{Group, GroupId, MemberId},
    Result,
};

/// Group repository for database operations
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, group: &Group) -> Result<Group> {
        let row = sqlx::query(
            "INSERT INTO groups (
                id, name, group_type, parent_id, leader_id, is_active,
                created_at, updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING
                id, name, group_type, parent_id, leader_id, is_active,
                created_at, updated_at",
        )
        .bind(group.id.as_str())
        .bind(&group.name)
        .bind(&group.group_type)
        .bind(group.parent_id.as_ref().map(GroupId::as_str))
        .bind(group.leader_id.as_ref().map(MemberId::as_str))
        .bind(group.is_active)
        .bind(group.created_at)
        .bind(group.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row_to_group(&row)
    }

    pub async fn get_by_id(&self, group_id: &GroupId) -> Result<Option<Group>> {
        let row = sqlx::query(
            "SELECT
                id, name, group_type, parent_id, leader_id, is_active,
                created_at, updated_at
             FROM groups
             WHERE id = $1",
        )
        .bind(group_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_group).transpose()
    }

    pub async fn exists(&self, group_id: &GroupId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM groups WHERE id = $1")
            .bind(group_id.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}

fn row_to_group(row: &PgRow) -> Result<Group> {
    Ok(Group {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        group_type: row.try_get("group_type")?,
        parent_id: row.try_get("parent_id")?,
        leader_id: row.try_get("leader_id")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
