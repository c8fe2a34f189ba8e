//! JSON shapes exchanged with the recognition service.

use serde::{Deserialize, Serialize};

/// Recognition endpoint.
pub const GENERATE_PATH: &str = "/api/generate";

/// Liveness endpoint.
pub const HEALTH_PATH: &str = "/api/health";

/// Returned as a successful result when the model finds nothing to transliterate.
pub const NO_RESULT_TEXT: &str = "No Grantha script could be generated.";

/// 400 message for a request without image data or media type.
pub const MISSING_FIELDS_MESSAGE: &str = "Image data and mimeType are required.";

/// Outgoing request, borrowed so a large payload is not copied.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    pub image: &'a str,
    pub mime_type: &'a str,
}

/// Incoming request as seen by the service; both fields may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequestBody {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl GenerateRequestBody {
    /// Both fields, if present and non-empty.
    pub fn fields(&self) -> Option<(&str, &str)> {
        match (self.image.as_deref(), self.mime_type.as_deref()) {
            (Some(image), Some(mime)) if !image.is_empty() && !mime.is_empty() => {
                Some((image, mime))
            }
            _ => None,
        }
    }
}

/// Response body for both outcomes: `{ "resultText" }` or `{ "error" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            result_text: Some(text.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result_text: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let req = GenerateRequest {
            image: "aGk=",
            mime_type: "image/png",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["image"], "aGk=");
        assert_eq!(json["mimeType"], "image/png");
    }

    #[test]
    fn test_request_body_requires_both_fields() {
        let body: GenerateRequestBody =
            serde_json::from_str(r#"{"image":"aGk=","mimeType":"image/png"}"#).unwrap();
        assert_eq!(body.fields(), Some(("aGk=", "image/png")));

        let body: GenerateRequestBody = serde_json::from_str(r#"{"image":"aGk="}"#).unwrap();
        assert!(body.fields().is_none());

        let body: GenerateRequestBody =
            serde_json::from_str(r#"{"image":"","mimeType":"image/png"}"#).unwrap();
        assert!(body.fields().is_none());
    }

    #[test]
    fn test_response_shapes() {
        let ok = serde_json::to_string(&GenerateResponse::text("abc")).unwrap();
        assert_eq!(ok, r#"{"resultText":"abc"}"#);

        let err = serde_json::to_string(&GenerateResponse::error("boom")).unwrap();
        assert_eq!(err, r#"{"error":"boom"}"#);

        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, GenerateResponse::default());
    }
}
