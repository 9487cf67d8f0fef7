// HTTP error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

/// Application error with HTTP status code
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

/// Error response JSON structure
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
    status: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = Json(ErrorResponse {
            error: self.message,
            status: status.as_u16(),
        });

        (status, body).into_response()
    }
}

/// Convert parish_core errors to HTTP errors
impl From<parish_core::Error> for AppError {
    fn from(err: parish_core::Error) -> Self {
        use parish_core::Error;

        match err {
            Error::NotFound(msg) => Self::not_found(msg),
            Error::Forbidden(msg) => Self::forbidden(msg),
            Error::Conflict(msg) => Self::conflict(msg),
            Error::DuplicateRegistration { .. } => Self::conflict(err.to_string()),
            Error::InvalidInput(msg) => Self::unprocessable(msg),
            Error::RegistrationClosed { reason } => Self::unprocessable(reason),
            Error::GuestsNotAllowed | Error::GuestLimitExceeded { .. } => {
                Self::unprocessable(err.to_string())
            }
            Error::Database(e) => {
                tracing::error!("Database error: {}", e);
                Self::internal_server_error("Database error")
            }
            Error::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                Self::internal_server_error("Data processing error")
            }
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parish_core::models::RegistrationId;

    #[test]
    fn test_error_status_mapping() {
        let forbidden: AppError =
            parish_core::Error::Forbidden("Missing permission: view_members".to_string()).into();
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

        let not_found: AppError =
            parish_core::Error::NotFound("Event not found".to_string()).into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);

        let duplicate: AppError = parish_core::Error::DuplicateRegistration {
            registration_id: RegistrationId::from_string("abc123def456".to_string()),
        }
        .into();
        assert_eq!(duplicate.status, StatusCode::CONFLICT);
        assert!(duplicate.message.contains("abc123def456"));

        let closed: AppError = parish_core::Error::RegistrationClosed {
            reason: "Registration closed (at capacity)".to_string(),
        }
        .into();
        assert_eq!(closed.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(closed.message.contains("capacity"));

        let guests: AppError = parish_core::Error::GuestLimitExceeded { max: 2 }.into();
        assert_eq!(guests.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
