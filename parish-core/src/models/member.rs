use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::id::{GroupId, MemberId};
use super::permission::GroupRole;

/// A person in the congregation directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Where a membership's effective permissions come from.
///
/// The two competing sources of truth (explicit JSON override column vs.
/// the relational role-default template) are resolved here, in one place:
/// a non-null override — even an empty one — supersedes the template
/// entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionSource {
    Override(HashSet<String>),
    RoleDefault,
}

/// Membership join entity: a member holding a role within a group.
///
/// Rows are never deleted; an ended membership keeps its row with
/// `exit_date` set and `is_active` false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub group_id: GroupId,
    pub member_id: MemberId,
    pub role: GroupRole,
    /// Free-form title, only meaningful when `role` is `Other`.
    pub custom_role_title: Option<String>,
    /// Explicit permission override. `None` means role defaults apply;
    /// `Some` — even when empty — replaces them completely.
    pub permissions: Option<Vec<String>>,
    pub is_active: bool,
    pub join_date: DateTime<Utc>,
    pub exit_date: Option<DateTime<Utc>>,
}

impl GroupMember {
    pub fn new(group_id: GroupId, member_id: MemberId, role: GroupRole) -> Self {
        Self {
            group_id,
            member_id,
            role,
            custom_role_title: None,
            permissions: None,
            is_active: true,
            join_date: Utc::now(),
            exit_date: None,
        }
    }

    /// Whether this membership is still current.
    pub fn is_current(&self) -> bool {
        self.is_active && self.exit_date.is_none()
    }

    /// Resolve which source the effective permission set comes from.
    pub fn permission_source(&self) -> PermissionSource {
        match &self.permissions {
            Some(slugs) => PermissionSource::Override(slugs.iter().cloned().collect()),
            None => PermissionSource::RoleDefault,
        }
    }

    /// End the membership without deleting the row.
    pub fn end(&mut self) {
        self.is_active = false;
        self.exit_date = Some(Utc::now());
    }
}

/// Add member request
#[derive(Debug, Clone, Deserialize)]
pub struct AddGroupMemberRequest {
    pub member_id: MemberId,
    pub role: GroupRole,
    pub custom_role_title: Option<String>,
    pub permissions: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_source_none_is_role_default() {
        let member = GroupMember::new(GroupId::new(), MemberId::new(), GroupRole::Secretary);
        assert_eq!(member.permission_source(), PermissionSource::RoleDefault);
    }

    #[test]
    fn test_empty_override_supersedes_role_default() {
        let mut member = GroupMember::new(GroupId::new(), MemberId::new(), GroupRole::Secretary);
        member.permissions = Some(vec![]);
        assert_eq!(
            member.permission_source(),
            PermissionSource::Override(HashSet::new())
        );
    }

    #[test]
    fn test_end_membership() {
        let mut member = GroupMember::new(GroupId::new(), MemberId::new(), GroupRole::Member);
        assert!(member.is_current());

        member.end();
        assert!(!member.is_current());
        assert!(member.exit_date.is_some());
    }
}
