use sqlx::{postgres::PgRow, types::Json, PgPool, Row};

use crate::{
    models::{GroupId, GroupMember, GroupRole, Member, MemberId},
    Result,
};

/// Member (person) repository for database operations
#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, member: &Member) -> Result<Member> {
        let row = sqlx::query(
            "INSERT INTO members (id, full_name, email, phone, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, full_name, email, phone, created_at",
        )
        .bind(member.id.as_str())
        .bind(&member.full_name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(member.created_at)
        .fetch_one(&self.pool)
        .await?;

        row_to_member(&row)
    }

    pub async fn get_by_id(&self, member_id: &MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            "SELECT id, full_name, email, phone, created_at
             FROM members
             WHERE id = $1",
        )
        .bind(member_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_member).transpose()
    }
}

/// Group membership repository.
///
/// Memberships are soft-ended: `exit_date`/`is_active` close them without
/// removing the row, preserving history.
#[derive(Clone)]
pub struct GroupMemberRepository {
    pool: PgPool,
}

impl GroupMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a member to a group with a role. Re-adding an ended membership
    /// reactivates the same row.
    pub async fn add(&self, membership: &GroupMember) -> Result<GroupMember> {
        let row = sqlx::query(
            "INSERT INTO group_members (
                group_id, member_id, role, custom_role_title, permissions,
                is_active, join_date
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (group_id, member_id, role) DO UPDATE
             SET
                custom_role_title = EXCLUDED.custom_role_title,
                permissions = EXCLUDED.permissions,
                is_active = TRUE,
                join_date = EXCLUDED.join_date,
                exit_date = NULL
             RETURNING
                group_id, member_id, role, custom_role_title, permissions,
                is_active, join_date, exit_date",
        )
        .bind(membership.group_id.as_str())
        .bind(membership.member_id.as_str())
        .bind(membership.role)
        .bind(&membership.custom_role_title)
        .bind(membership.permissions.as_ref().map(Json))
        .bind(membership.is_active)
        .bind(membership.join_date)
        .fetch_one(&self.pool)
        .await?;

        row_to_membership(&row)
    }

    /// Get one exact membership row.
    pub async fn get(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
        role: GroupRole,
    ) -> Result<Option<GroupMember>> {
        let row = sqlx::query(
            "SELECT
                group_id, member_id, role, custom_role_title, permissions,
                is_active, join_date, exit_date
             FROM group_members
             WHERE group_id = $1 AND member_id = $2 AND role = $3",
        )
        .bind(group_id.as_str())
        .bind(member_id.as_str())
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_membership).transpose()
    }

    /// All current (active, not exited) memberships a member holds in a
    /// group. A member can hold several roles at once.
    pub async fn list_current_for_member(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
    ) -> Result<Vec<GroupMember>> {
        let rows = sqlx::query(
            "SELECT
                group_id, member_id, role, custom_role_title, permissions,
                is_active, join_date, exit_date
             FROM group_members
             WHERE group_id = $1 AND member_id = $2
               AND is_active AND exit_date IS NULL",
        )
        .bind(group_id.as_str())
        .bind(member_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_membership).collect()
    }

    /// List all current memberships in a group.
    pub async fn list_by_group(&self, group_id: &GroupId) -> Result<Vec<GroupMember>> {
        let rows = sqlx::query(
            "SELECT
                group_id, member_id, role, custom_role_title, permissions,
                is_active, join_date, exit_date
             FROM group_members
             WHERE group_id = $1 AND is_active AND exit_date IS NULL
             ORDER BY join_date ASC",
        )
        .bind(group_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_membership).collect()
    }

    /// End a membership (soft delete: set exit_date, clear is_active).
    pub async fn end_membership(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
        role: GroupRole,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE group_members
             SET is_active = FALSE, exit_date = $4
             WHERE group_id = $1 AND member_id = $2 AND role = $3
               AND exit_date IS NULL",
        )
        .bind(group_id.as_str())
        .bind(member_id.as_str())
        .bind(role)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the explicit permission override. `None` restores role
    /// defaults; `Some(vec![])` is a valid "no permissions" override.
    pub async fn set_permission_override(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
        role: GroupRole,
        permissions: Option<&Vec<String>>,
    ) -> Result<GroupMember> {
        let row = sqlx::query(
            "UPDATE group_members
             SET permissions = $4
             WHERE group_id = $1 AND member_id = $2 AND role = $3
               AND is_active AND exit_date IS NULL
             RETURNING
                group_id, member_id, role, custom_role_title, permissions,
                is_active, join_date, exit_date",
        )
        .bind(group_id.as_str())
        .bind(member_id.as_str())
        .bind(role)
        .bind(permissions.map(Json))
        .fetch_one(&self.pool)
        .await?;

        row_to_membership(&row)
    }
}

fn row_to_member(row: &PgRow) -> Result<Member> {
    Ok(Member {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_membership(row: &PgRow) -> Result<GroupMember> {
    let permissions: Option<Json<Vec<String>>> = row.try_get("permissions")?;

    Ok(GroupMember {
        group_id: row.try_get("group_id")?,
        member_id: row.try_get("member_id")?,
        role: row.try_get("role")?,
        custom_role_title: row.try_get("custom_role_title")?,
        permissions: permissions.map(|Json(slugs)| slugs),
        is_active: row.try_get("is_active")?,
        join_date: row.try_get("join_date")?,
        exit_date: row.try_get("exit_date")?,
    })
}
