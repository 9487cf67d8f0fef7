use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::id::{EventId, MemberId, RegistrationId};

/// Registration lifecycle status. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Confirmed,
    Attended,
    Cancelled,
}

impl RegistrationStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Confirmed => "confirmed",
            Self::Attended => "attended",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "registered" => Ok(Self::Registered),
            "confirmed" => Ok(Self::Confirmed),
            "attended" => Ok(Self::Attended),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown registration status: {s}")),
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contact details for a walk-in guest registrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Who is registering: a directory member or an ad-hoc guest. The two are
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Registrant {
    Member(MemberId),
    Guest(GuestContact),
}

/// A record of intent to attend a group event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub member_id: Option<MemberId>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub status: RegistrationStatus,
    pub number_of_guests: i32,
    pub registered_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl EventRegistration {
    pub fn new(event_id: EventId, registrant: Registrant, number_of_guests: i32) -> Self {
        let (member_id, guest_name, guest_email, guest_phone) = match registrant {
            Registrant::Member(id) => (Some(id), None, None, None),
            Registrant::Guest(contact) => {
                (None, Some(contact.name), contact.email, contact.phone)
            }
        };

        Self {
            id: RegistrationId::new(),
            event_id,
            member_id,
            guest_name,
            guest_email,
            guest_phone,
            status: RegistrationStatus::Registered,
            number_of_guests,
            registered_at: Utc::now(),
            confirmed_at: None,
            cancelled_at: None,
        }
    }

    /// The registrant plus their accompanying guests.
    #[must_use]
    pub fn total_attendees(&self) -> i32 {
        1 + self.number_of_guests
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status.is_cancelled()
    }
}

/// Create registration request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRegistrationRequest {
    pub member_id: Option<MemberId>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    #[serde(default)]
    pub number_of_guests: i32,
}

impl CreateRegistrationRequest {
    /// Resolve the mutually-exclusive registrant identity.
    pub fn registrant(&self) -> Result<Registrant, String> {
        match (&self.member_id, &self.guest_name) {
            (Some(_), Some(_)) => {
                Err("Registration cannot be both a member and a guest".to_string())
            }
            (Some(member_id), None) => Ok(Registrant::Member(member_id.clone())),
            (None, Some(name)) => Ok(Registrant::Guest(GuestContact {
                name: name.clone(),
                email: self.guest_email.clone(),
                phone: self.guest_phone.clone(),
            })),
            (None, None) => Err("Registration requires a member_id or guest_name".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            RegistrationStatus::Registered,
            RegistrationStatus::Confirmed,
            RegistrationStatus::Attended,
            RegistrationStatus::Cancelled,
        ] {
            assert_eq!(RegistrationStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn test_total_attendees() {
        let registration = EventRegistration::new(
            EventId::new(),
            Registrant::Guest(GuestContact {
                name: "Ana".to_string(),
                email: None,
                phone: None,
            }),
            2,
        );
        assert_eq!(registration.total_attendees(), 3);
    }

    #[test]
    fn test_registrant_exclusivity() {
        let both = CreateRegistrationRequest {
            member_id: Some(MemberId::new()),
            guest_name: Some("Ana".to_string()),
            guest_email: None,
            guest_phone: None,
            number_of_guests: 0,
        };
        assert!(both.registrant().is_err());

        let neither = CreateRegistrationRequest {
            member_id: None,
            guest_name: None,
            guest_email: None,
            guest_phone: None,
            number_of_guests: 0,
        };
        assert!(neither.registrant().is_err());
    }
}
