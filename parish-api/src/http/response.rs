// Success response envelope

use axum::Json;
use serde::Serialize;

/// Success body: `{"status": "success", "data": ...}`. The error half of
/// the contract lives in [`super::error`].
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

/// Wrap a payload in the success envelope.
pub fn success<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        status: "success",
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let Json(body) = success(serde_json::json!({ "headcount": 12 }));
        let rendered = serde_json::to_value(&body).unwrap();

        assert_eq!(rendered["status"], "success");
        assert_eq!(rendered["data"]["headcount"], 12);
    }
}
