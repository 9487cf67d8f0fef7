//! Test helpers and fixtures for parish-core tests
//!
//! Builder-style fixtures for the domain entities, to keep test setup
//! terse and consistent across unit and integration tests.

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    EventId, EventRegistration, Group, GroupEvent, GroupId, GroupMember, GroupRole, Member,
    MemberId, Registrant, RegistrationStatus,
};

/// Create a test group ID from a literal
pub fn test_group_id(id: &str) -> GroupId {
    GroupId::from_string(id.to_string())
}

/// Create a test member ID from a literal
pub fn test_member_id(id: &str) -> MemberId {
    MemberId::from_string(id.to_string())
}

pub fn random_group_id() -> GroupId {
    GroupId::new()
}

pub fn random_member_id() -> MemberId {
    MemberId::new()
}

/// Test fixture builder for Group
pub struct GroupFixture {
    name: String,
    group_type: String,
    leader_id: Option<MemberId>,
}

impl GroupFixture {
    pub fn new() -> Self {
        Self {
            name: "Test Group".to_string(),
            group_type: "ministry".to_string(),
            leader_id: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_type(mut self, group_type: &str) -> Self {
        self.group_type = group_type.to_string();
        self
    }

    pub fn with_leader(mut self, leader_id: MemberId) -> Self {
        self.leader_id = Some(leader_id);
        self
    }

    pub fn build(self) -> Group {
        let mut group = Group::new(self.name, self.group_type);
        group.leader_id = self.leader_id;
        group
    }
}

impl Default for GroupFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Test fixture builder for Member
pub struct MemberFixture {
    full_name: String,
    email: Option<String>,
}

impl MemberFixture {
    pub fn new() -> Self {
        Self {
            full_name: "Test Member".to_string(),
            email: Some("test@example.com".to_string()),
        }
    }

    pub fn with_name(mut self, full_name: &str) -> Self {
        self.full_name = full_name.to_string();
        self
    }

    pub fn build(self) -> Member {
        Member {
            id: MemberId::new(),
            full_name: self.full_name,
            email: self.email,
            phone: None,
            created_at: Utc::now(),
        }
    }
}

impl Default for MemberFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Test fixture builder for GroupMember
pub struct MembershipFixture {
    group_id: GroupId,
    member_id: MemberId,
    role: GroupRole,
    permissions: Option<Vec<String>>,
}

impl MembershipFixture {
    pub fn new() -> Self {
        Self {
            group_id: GroupId::new(),
            member_id: MemberId::new(),
            role: GroupRole::Member,
            permissions: None,
        }
    }

    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = group_id;
        self
    }

    pub fn for_member(mut self, member_id: MemberId) -> Self {
        self.member_id = member_id;
        self
    }

    pub fn with_role(mut self, role: GroupRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_override(mut self, slugs: &[&str]) -> Self {
        self.permissions = Some(slugs.iter().map(|s| (*s).to_string()).collect());
        self
    }

    pub fn build(self) -> GroupMember {
        let mut membership = GroupMember::new(self.group_id, self.member_id, self.role);
        membership.permissions = self.permissions;
        membership
    }
}

impl Default for MembershipFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Test fixture builder for GroupEvent
pub struct EventFixture {
    group_id: GroupId,
    title: String,
    starts_at: DateTime<Utc>,
    registration_required: bool,
    registration_capacity: Option<i32>,
    registration_deadline: Option<DateTime<Utc>>,
    allow_guests: bool,
    max_guests_per_registration: i32,
    registration_count: i32,
    is_active: bool,
}

impl EventFixture {
    pub fn new() -> Self {
        Self {
            group_id: GroupId::new(),
            title: "Test Event".to_string(),
            starts_at: Utc::now() + Duration::days(7),
            registration_required: true,
            registration_capacity: None,
            registration_deadline: None,
            allow_guests: false,
            max_guests_per_registration: 0,
            registration_count: 0,
            is_active: true,
        }
    }

    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = group_id;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.registration_capacity = Some(capacity);
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.registration_deadline = Some(deadline);
        self
    }

    pub fn with_registration_count(mut self, count: i32) -> Self {
        self.registration_count = count;
        self
    }

    pub fn allowing_guests(mut self, max_per_registration: i32) -> Self {
        self.allow_guests = true;
        self.max_guests_per_registration = max_per_registration;
        self
    }

    pub fn without_registration(mut self) -> Self {
        self.registration_required = false;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn build(self) -> GroupEvent {
        let now = Utc::now();
        GroupEvent {
            id: EventId::new(),
            group_id: self.group_id,
            title: self.title,
            location: None,
            starts_at: self.starts_at,
            ends_at: None,
            registration_required: self.registration_required,
            registration_capacity: self.registration_capacity,
            registration_deadline: self.registration_deadline,
            allow_guests: self.allow_guests,
            max_guests_per_registration: self.max_guests_per_registration,
            registration_count: self.registration_count,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for EventFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Test fixture builder for EventRegistration
pub struct RegistrationFixture {
    event_id: EventId,
    registrant: Registrant,
    number_of_guests: i32,
    status: RegistrationStatus,
}

impl RegistrationFixture {
    pub fn new() -> Self {
        Self {
            event_id: EventId::new(),
            registrant: Registrant::Member(MemberId::new()),
            number_of_guests: 0,
            status: RegistrationStatus::Registered,
        }
    }

    pub fn for_event(mut self, event_id: EventId) -> Self {
        self.event_id = event_id;
        self
    }

    pub fn by(mut self, registrant: Registrant) -> Self {
        self.registrant = registrant;
        self
    }

    pub fn with_guests(mut self, number_of_guests: i32) -> Self {
        self.number_of_guests = number_of_guests;
        self
    }

    pub fn with_status(mut self, status: RegistrationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> EventRegistration {
        let mut registration =
            EventRegistration::new(self.event_id, self.registrant, self.number_of_guests);
        registration.status = self.status;
        registration
    }
}

impl Default for RegistrationFixture {
    fn default() -> Self {
        Self::new()
    }
}
