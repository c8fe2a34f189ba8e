//! HTTP client for the recognition service (`POST /api/generate`).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use grantha_core::{
    EncodedImage, GenerateRequest, GenerateResponse, GranthaError, Recognizer, Result,
    GENERATE_PATH, NO_RESULT_TEXT,
};

/// Sends one encoded image per request to the recognition service.
///
/// Single attempt, no retry: any failure comes back as `GranthaError::Client`.
pub struct RecognitionClient {
    client: Client,
    base_url: String,
}

impl RecognitionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), GENERATE_PATH)
    }
}

#[async_trait]
impl Recognizer for RecognitionClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn recognize(&self, image: &EncodedImage) -> Result<String> {
        let body = GenerateRequest {
            image: &image.payload,
            mime_type: &image.mime_type,
        };

        debug!(
            endpoint = %self.endpoint(),
            mime = %image.mime_type,
            payload_len = image.payload.len(),
            "Sending image to recognition service"
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Recognition request failed");
                GranthaError::client(format!("Request to recognition service failed: {e}"))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            GranthaError::client(format!("Failed to read recognition response: {e}"))
        })?;

        if !status.is_success() {
            return Err(GranthaError::Client(error_message(status, &text)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            GranthaError::client(format!("Malformed response from recognition service: {e}"))
        })?;
        interpret(parsed)
    }
}

/// Message for a non-success response: the service's own `error` when it sent
/// one, otherwise a description of the status.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<GenerateResponse>(body) {
        Ok(GenerateResponse {
            error: Some(message),
            ..
        }) if !message.trim().is_empty() => message,
        Ok(_) => format!("Server responded with status: {}", status.as_u16()),
        Err(_) => format!(
            "Server returned a non-JSON error response (status {})",
            status.as_u16()
        ),
    }
}

fn interpret(response: GenerateResponse) -> Result<String> {
    match response {
        GenerateResponse {
            result_text: Some(text),
            ..
        } if !text.is_empty() => Ok(text),
        GenerateResponse {
            error: Some(message),
            ..
        } => Err(GranthaError::Client(message)),
        _ => Ok(NO_RESULT_TEXT.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn image() -> EncodedImage {
        EncodedImage::new("aGVsbG8=", "image/png")
    }

    #[tokio::test]
    async fn test_returns_result_text() {
        let app = Router::new().route(
            GENERATE_PATH,
            post(|Json(body): Json<Value>| async move {
                let echoed = format!(
                    "{}|{}",
                    body["mimeType"].as_str().unwrap_or_default(),
                    body["image"].as_str().unwrap_or_default()
                );
                Json(json!({ "resultText": echoed }))
            }),
        );
        let client = RecognitionClient::new(serve(app).await);

        let text = client.recognize(&image()).await.unwrap();
        assert_eq!(text, "image/png|aGVsbG8=");
    }

    #[tokio::test]
    async fn test_empty_result_is_sentinel() {
        let app = Router::new().route(GENERATE_PATH, post(|| async { Json(json!({})) }));
        let client = RecognitionClient::new(serve(app).await);

        assert_eq!(client.recognize(&image()).await.unwrap(), NO_RESULT_TEXT);
    }

    #[tokio::test]
    async fn test_whitespace_result_is_returned_verbatim() {
        let app = Router::new().route(
            GENERATE_PATH,
            post(|| async { Json(json!({ "resultText": " " })) }),
        );
        let client = RecognitionClient::new(serve(app).await);

        assert_eq!(client.recognize(&image()).await.unwrap(), " ");
    }

    #[tokio::test]
    async fn test_empty_string_result_is_sentinel() {
        let app = Router::new().route(
            GENERATE_PATH,
            post(|| async { Json(json!({ "resultText": "" })) }),
        );
        let client = RecognitionClient::new(serve(app).await);

        assert_eq!(client.recognize(&image()).await.unwrap(), NO_RESULT_TEXT);
    }

    #[tokio::test]
    async fn test_service_error_message_is_kept() {
        let app = Router::new().route(
            GENERATE_PATH,
            post(|| async {
                (AxumStatus::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" })))
            }),
        );
        let client = RecognitionClient::new(serve(app).await);

        let err = client.recognize(&image()).await.unwrap_err();
        assert!(matches!(err, GranthaError::Client(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let app = Router::new().route(
            GENERATE_PATH,
            post(|| async { (AxumStatus::BAD_GATEWAY, "<html>upstream down</html>") }),
        );
        let client = RecognitionClient::new(serve(app).await);

        let err = client.recognize(&image()).await.unwrap_err();
        assert!(err.to_string().contains("non-JSON"));
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_error_without_message_reports_status() {
        let app = Router::new().route(
            GENERATE_PATH,
            post(|| async { (AxumStatus::SERVICE_UNAVAILABLE, Json(json!({}))) }),
        );
        let client = RecognitionClient::new(serve(app).await);

        let err = client.recognize(&image()).await.unwrap_err();
        assert!(err.to_string().contains("Server responded with status: 503"));
    }

    #[tokio::test]
    async fn test_application_error_on_success_status() {
        let app = Router::new().route(
            GENERATE_PATH,
            post(|| async { Json(json!({ "error": "quota exhausted" })) }),
        );
        let client = RecognitionClient::new(serve(app).await);

        let err = client.recognize(&image()).await.unwrap_err();
        assert!(err.to_string().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let app = Router::new().route(GENERATE_PATH, post(|| async { "not json" }));
        let client = RecognitionClient::new(serve(app).await);

        let err = client.recognize(&image()).await.unwrap_err();
        assert!(err.to_string().contains("Malformed response"));
    }

    #[tokio::test]
    async fn test_network_failure_is_client_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RecognitionClient::new(format!("http://{addr}"));
        let err = client.recognize(&image()).await.unwrap_err();
        assert!(matches!(err, GranthaError::Client(_)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = RecognitionClient::new("http://localhost:8080/");
        assert_eq!(client.endpoint(), "http://localhost:8080/api/generate");
    }
}
