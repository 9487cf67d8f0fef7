use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{EventId, GroupId};

/// Derived registration state of an event. Not stored; recomputed from the
/// event row against the current time.
///
/// When several closing conditions hold at once the earliest-blocking one
/// wins: inactive > deadline > capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    NotRequired,
    Open,
    ClosedInactive,
    ClosedDeadline,
    ClosedCapacity,
}

impl RegistrationState {
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Human-readable status line.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::NotRequired => "Registration not required",
            Self::Open => "Registration open",
            Self::ClosedInactive => "Registration closed (event inactive)",
            Self::ClosedDeadline => "Registration closed (deadline passed)",
            Self::ClosedCapacity => "Registration closed (at capacity)",
        }
    }
}

impl std::fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A scheduled group event, optionally taking registrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEvent {
    pub id: EventId,
    pub group_id: GroupId,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub registration_required: bool,
    /// `None` means unlimited capacity.
    pub registration_capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub allow_guests: bool,
    /// 0 means no per-registration guest cap.
    pub max_guests_per_registration: i32,
    /// Denormalized count of live (non-cancelled) registrations. Maintained
    /// atomically with registration inserts/cancellations.
    pub registration_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupEvent {
    /// Compute the registration state as of `now`.
    pub fn registration_state(&self, now: DateTime<Utc>) -> RegistrationState {
        if !self.registration_required {
            return RegistrationState::NotRequired;
        }
        if !self.is_active {
            return RegistrationState::ClosedInactive;
        }
        if let Some(deadline) = self.registration_deadline {
            if now > deadline {
                return RegistrationState::ClosedDeadline;
            }
        }
        if let Some(capacity) = self.registration_capacity {
            if self.registration_count >= capacity {
                return RegistrationState::ClosedCapacity;
            }
        }
        RegistrationState::Open
    }

    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        self.registration_state(now).is_open()
    }

    /// Remaining spots, floored at zero. `None` when capacity is unlimited.
    #[must_use]
    pub fn available_spots(&self) -> Option<i32> {
        self.registration_capacity
            .map(|capacity| (capacity - self.registration_count).max(0))
    }

    pub fn registration_status_description(&self, now: DateTime<Utc>) -> &'static str {
        self.registration_state(now).description()
    }
}

/// Create event request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub registration_required: bool,
    pub registration_capacity: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub allow_guests: bool,
    #[serde(default)]
    pub max_guests_per_registration: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_event() -> GroupEvent {
        let now = Utc::now();
        GroupEvent {
            id: EventId::new(),
            group_id: GroupId::new(),
            title: "Youth retreat".to_string(),
            location: None,
            starts_at: now + Duration::days(7),
            ends_at: None,
            registration_required: true,
            registration_capacity: None,
            registration_deadline: None,
            allow_guests: false,
            max_guests_per_registration: 0,
            registration_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_not_required_event() {
        let mut event = base_event();
        event.registration_required = false;

        let state = event.registration_state(Utc::now());
        assert_eq!(state, RegistrationState::NotRequired);
        assert!(!event.is_registration_open(Utc::now()));
    }

    #[test]
    fn test_open_without_limits() {
        let event = base_event();
        assert!(event.is_registration_open(Utc::now()));
        assert_eq!(event.available_spots(), None);
    }

    #[test]
    fn test_deadline_closes_registration() {
        let mut event = base_event();
        event.registration_deadline = Some(Utc::now() - Duration::hours(1));

        let state = event.registration_state(Utc::now());
        assert_eq!(state, RegistrationState::ClosedDeadline);
        assert!(state.description().contains("deadline"));
    }

    #[test]
    fn test_capacity_closes_registration() {
        let mut event = base_event();
        event.registration_capacity = Some(10);
        event.registration_count = 10;

        assert_eq!(
            event.registration_state(Utc::now()),
            RegistrationState::ClosedCapacity
        );
        assert_eq!(event.available_spots(), Some(0));
    }

    #[test]
    fn test_close_reason_priority() {
        // inactive > deadline > capacity
        let mut event = base_event();
        event.is_active = false;
        event.registration_deadline = Some(Utc::now() - Duration::hours(1));
        event.registration_capacity = Some(1);
        event.registration_count = 1;

        assert_eq!(
            event.registration_state(Utc::now()),
            RegistrationState::ClosedInactive
        );

        event.is_active = true;
        assert_eq!(
            event.registration_state(Utc::now()),
            RegistrationState::ClosedDeadline
        );

        event.registration_deadline = None;
        assert_eq!(
            event.registration_state(Utc::now()),
            RegistrationState::ClosedCapacity
        );
    }

    #[test]
    fn test_available_spots_floored_at_zero() {
        let mut event = base_event();
        event.registration_capacity = Some(5);
        event.registration_count = 7; // drifted counter from legacy data
        assert_eq!(event.available_spots(), Some(0));
    }
}
