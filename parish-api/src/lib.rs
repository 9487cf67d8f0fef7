//! HTTP API for the parish group-management backend.

pub mod http;

pub use http::{create_router, AppError, AppResult, AppState};
