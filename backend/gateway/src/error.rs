//! HTTP error responses. Every failure is answered with `{ "error": ... }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use grantha_core::{GenerateResponse, GranthaError};

/// Shown to clients when the vision model call fails. The cause is only logged.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to process image with the vision model.";

pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body is too large.";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn upstream() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE_MESSAGE)
    }
}

impl From<GranthaError> for ApiError {
    fn from(err: GranthaError) -> Self {
        match err {
            GranthaError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            GranthaError::Upstream(_) => Self::upstream(),
            GranthaError::Timeout(_) => Self::new(StatusCode::GATEWAY_TIMEOUT, err.to_string()),
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error."),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(GenerateResponse::error(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use grantha_core::MISSING_FIELDS_MESSAGE;

    async fn render(err: ApiError) -> (StatusCode, GenerateResponse) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let err = ApiError::from(GranthaError::Validation(MISSING_FIELDS_MESSAGE.into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, GenerateResponse::error(MISSING_FIELDS_MESSAGE));
    }

    #[tokio::test]
    async fn test_upstream_cause_is_hidden() {
        let err = ApiError::from(GranthaError::upstream("quota exceeded for key=AIza123"));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some(UPSTREAM_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_504() {
        let err = ApiError::from(GranthaError::Timeout(std::time::Duration::from_secs(5)));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(body.error.unwrap().contains("timed out"));
    }

    #[test]
    fn test_response_is_json_error() {
        let response = ApiError::upstream().into_response();
        assert_eq!(response.headers()["content-type"], "application/json");
    }
}
