use thiserror::Error;

use crate::models::RegistrationId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already registered for this event (registration {registration_id})")]
    DuplicateRegistration { registration_id: RegistrationId },

    #[error("{reason}")]
    RegistrationClosed { reason: String },

    #[error("Guests are not allowed for this event")]
    GuestsNotAllowed,

    #[error("Guest count exceeds the per-registration limit of {max}")]
    GuestLimitExceeded { max: i32 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // Map "no rows" to NotFound
            sqlx::Error::RowNotFound => Self::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().unwrap_or_default();
                match code.as_ref() {
                    // PostgreSQL unique_violation
                    "23505" => {
                        let detail = db_err.message().to_string();
                        if detail.contains("event_registrations_live_member_idx") {
                            Self::Conflict("Already registered for this event".to_string())
                        } else if detail.contains("group_role_permissions") {
                            Self::Conflict(
                                "Role permission assignment already exists".to_string(),
                            )
                        } else {
                            Self::Conflict("Resource already exists".to_string())
                        }
                    }
                    // PostgreSQL foreign_key_violation
                    "23503" => Self::NotFound("Referenced resource not found".to_string()),
                    // PostgreSQL check_violation
                    "23514" => Self::InvalidInput("Constraint check failed".to_string()),
                    // PostgreSQL not_null_violation
                    "23502" => Self::InvalidInput("Required field is missing".to_string()),
                    _ => Self::Database(err),
                }
            }
            _ => Self::Database(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
