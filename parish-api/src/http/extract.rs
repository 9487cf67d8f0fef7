//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use parish_core::models::MemberId;

use super::AppError;

/// The member a request acts as, taken from the `X-Member-Id` header.
///
/// Identity verification (sessions, tokens) is handled upstream by the
/// gateway; by the time a request reaches this service the header is
/// trusted. Handlers still authorize the member against the target group's
/// role configuration.
#[derive(Debug, Clone)]
pub struct ActingMember {
    pub member_id: MemberId,
}

impl<S> FromRequestParts<S> for ActingMember
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-member-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::unauthorized("Missing X-Member-Id header"))?;

        Ok(Self {
            member_id: MemberId::from_string(header.to_string()),
        })
    }
}
