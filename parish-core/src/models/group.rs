use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{GroupId, MemberId};

/// A named collection of members (ministry, committee, small group) with
/// its own role/permission configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub group_type: String,
    pub parent_id: Option<GroupId>,
    pub leader_id: Option<MemberId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: String, group_type: String) -> Self {
        let now = Utc::now();
        Self {
            id: GroupId::new(),
            name,
            group_type,
            parent_id: None,
            leader_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Create group request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default = "default_group_type")]
    pub group_type: String,
    pub parent_id: Option<GroupId>,
    pub leader_id: Option<MemberId>,
}

fn default_group_type() -> String {
    "ministry".to_string()
}
