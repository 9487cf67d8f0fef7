//! Roles and the permission catalog.
//!
//! Permissions are atomic capability slugs held in an immutable catalog
//! table. Each group configures its own role-default template (which slugs
//! a role carries); members may carry an explicit override list that
//! supersedes the template entirely. The `Leader` role bypasses all stored
//! configuration and is always granted everything.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::id::PermissionId;

/// Role a member holds within a specific group.
///
/// The set is closed; free-form positions use `Other` together with
/// `custom_role_title` on the membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    /// Always granted every permission, regardless of stored configuration.
    Leader,
    AssistantLeader,
    Secretary,
    Treasurer,
    Member,
    /// Custom position; permissions come from the group's `other` template.
    Other,
}

impl GroupRole {
    /// All roles, in template-seeding order.
    pub const ALL: [Self; 6] = [
        Self::Leader,
        Self::AssistantLeader,
        Self::Secretary,
        Self::Treasurer,
        Self::Member,
        Self::Other,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::AssistantLeader => "assistant_leader",
            Self::Secretary => "secretary",
            Self::Treasurer => "treasurer",
            Self::Member => "member",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn is_leader(&self) -> bool {
        matches!(self, Self::Leader)
    }
}

impl FromStr for GroupRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "leader" => Ok(Self::Leader),
            "assistant_leader" => Ok(Self::AssistantLeader),
            "secretary" => Ok(Self::Secretary),
            "treasurer" => Ok(Self::Treasurer),
            "member" => Ok(Self::Member),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

impl std::fmt::Display for GroupRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Database mapping: GroupRole <-> TEXT
impl sqlx::Type<sqlx::Postgres> for GroupRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl sqlx::Encode<'_, sqlx::Postgres> for GroupRole {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for GroupRole {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Self::from_str(s.trim_end()).map_err(Into::into)
    }
}

/// Permission catalog entry. Immutable reference data, seeded by migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub slug: String,
    pub name: String,
    pub category: String,
}

/// Well-known permission slugs (matching the seeded catalog).
pub mod slugs {
    // members
    pub const VIEW_MEMBERS: &str = "view_members";
    pub const MANAGE_MEMBERS: &str = "manage_members";
    pub const REMOVE_MEMBERS: &str = "remove_members";
    // attendance
    pub const VIEW_ATTENDANCE: &str = "view_attendance";
    pub const MANAGE_ATTENDANCE: &str = "manage_attendance";
    // events
    pub const VIEW_EVENTS: &str = "view_events";
    pub const MANAGE_EVENTS: &str = "manage_events";
    pub const DELETE_EVENTS: &str = "delete_events";
    // communication
    pub const SEND_MESSAGES: &str = "send_messages";
    pub const MANAGE_ANNOUNCEMENTS: &str = "manage_announcements";
    // finance
    pub const VIEW_FINANCES: &str = "view_finances";
    pub const MANAGE_DONATIONS: &str = "manage_donations";
    pub const MANAGE_BUDGET: &str = "manage_budget";
    // analytics
    pub const VIEW_ANALYTICS: &str = "view_analytics";
    pub const EXPORT_REPORTS: &str = "export_reports";
    // settings / roles
    pub const MANAGE_SETTINGS: &str = "manage_settings";
    pub const MANAGE_ROLES: &str = "manage_roles";

    /// Every slug in the catalog.
    pub const ALL: [&str; 17] = [
        VIEW_MEMBERS,
        MANAGE_MEMBERS,
        REMOVE_MEMBERS,
        VIEW_ATTENDANCE,
        MANAGE_ATTENDANCE,
        VIEW_EVENTS,
        MANAGE_EVENTS,
        DELETE_EVENTS,
        SEND_MESSAGES,
        MANAGE_ANNOUNCEMENTS,
        VIEW_FINANCES,
        MANAGE_DONATIONS,
        MANAGE_BUDGET,
        VIEW_ANALYTICS,
        EXPORT_REPORTS,
        MANAGE_SETTINGS,
        MANAGE_ROLES,
    ];
}

impl GroupRole {
    /// Default permission template seeded for a newly created group.
    ///
    /// Leader gets the full catalog (and bypasses it at check time anyway);
    /// assistant leaders everything except settings and role management;
    /// secretaries the member/attendance/event/communication categories
    /// minus destructive actions; treasurers the finance and analytics
    /// subset; plain members read-only analytics. `Other` starts empty and
    /// is configured per group.
    #[must_use]
    pub fn default_template(&self) -> Vec<&'static str> {
        match self {
            Self::Leader => slugs::ALL.to_vec(),
            Self::AssistantLeader => slugs::ALL
                .iter()
                .copied()
                .filter(|s| *s != slugs::MANAGE_SETTINGS && *s != slugs::MANAGE_ROLES)
                .collect(),
            Self::Secretary => vec![
                slugs::VIEW_MEMBERS,
                slugs::MANAGE_MEMBERS,
                slugs::VIEW_ATTENDANCE,
                slugs::MANAGE_ATTENDANCE,
                slugs::VIEW_EVENTS,
                slugs::MANAGE_EVENTS,
                slugs::SEND_MESSAGES,
                slugs::MANAGE_ANNOUNCEMENTS,
            ],
            Self::Treasurer => vec![
                slugs::VIEW_FINANCES,
                slugs::MANAGE_DONATIONS,
                slugs::MANAGE_BUDGET,
                slugs::VIEW_ANALYTICS,
                slugs::EXPORT_REPORTS,
            ],
            Self::Member => vec![slugs::VIEW_ANALYTICS],
            Self::Other => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in GroupRole::ALL {
            assert_eq!(GroupRole::from_str(role.as_str()), Ok(role));
        }
        assert!(GroupRole::from_str("pastor").is_err());
    }

    #[test]
    fn test_default_templates() {
        let leader = GroupRole::Leader.default_template();
        assert_eq!(leader.len(), slugs::ALL.len());

        let assistant = GroupRole::AssistantLeader.default_template();
        assert!(!assistant.contains(&slugs::MANAGE_SETTINGS));
        assert!(!assistant.contains(&slugs::MANAGE_ROLES));
        assert_eq!(assistant.len(), slugs::ALL.len() - 2);

        let secretary = GroupRole::Secretary.default_template();
        assert!(secretary.contains(&slugs::MANAGE_ATTENDANCE));
        assert!(!secretary.contains(&slugs::REMOVE_MEMBERS));
        assert!(!secretary.contains(&slugs::DELETE_EVENTS));

        let treasurer = GroupRole::Treasurer.default_template();
        assert!(treasurer.contains(&slugs::MANAGE_BUDGET));
        assert!(!treasurer.contains(&slugs::MANAGE_MEMBERS));

        assert_eq!(GroupRole::Member.default_template(), vec![slugs::VIEW_ANALYTICS]);
        assert!(GroupRole::Other.default_template().is_empty());
    }
}
