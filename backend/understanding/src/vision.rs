//! Vision transliteration: OCR an image and transliterate it into Tamil
//! Grantha script using a vision LLM with a structured JSON response.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{info, warn};

use grantha_core::{GranthaError, Result};
use grantha_logging::redact_sensitive_data;

/// Fixed instruction sent with every image.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert in ancient scripts. \
Your task is to perform Optical Character Recognition (OCR) on the provided image to extract any text. \
Then, you must transliterate the recognized text into Tamil Grantha script. \
The output must be a JSON object containing only the transliterated text.";

/// Field of the structured response holding the transliteration.
const RESULT_FIELD: &str = "grantha_script";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A model that reads an image and returns its Grantha transliteration.
#[async_trait]
pub trait VisionModel: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` means the model answered but produced nothing usable.
    async fn transliterate(&self, image_b64: &str, mime_type: &str) -> Result<Option<String>>;
}

/// Gemini `generateContent` with a response schema.
pub struct GeminiTransliterator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTransliterator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn request_body(image_b64: &str, mime_type: &str) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "parts": [
                { "inlineData": { "mimeType": mime_type, "data": image_b64 } }
            ]}],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        RESULT_FIELD: {
                            "type": "STRING",
                            "description": "The transliterated text in Tamil Grantha script."
                        }
                    },
                    "required": [RESULT_FIELD]
                }
            }
        })
    }
}

#[async_trait]
impl VisionModel for GeminiTransliterator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn transliterate(&self, image_b64: &str, mime_type: &str) -> Result<Option<String>> {
        info!(model = %self.model, mime = %mime_type, "[Vision] Transliterating image via Gemini");
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(image_b64, mime_type))
            .send()
            .await
            .map_err(|e| GranthaError::upstream(format!("Gemini request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %redact_sensitive_data(&body), "[Vision] Gemini error");
            return Err(GranthaError::upstream(format!("Gemini returned {status}")));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| GranthaError::upstream(format!("Unreadable Gemini response: {e}")))?;
        let text = response_text(&json)
            .ok_or_else(|| GranthaError::upstream("Gemini response contained no text"))?;
        extract_transliteration(&text)
    }
}

/// Concatenated text parts of the first candidate.
fn response_text(json: &Value) -> Option<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    Some(text)
}

/// Pull the transliteration out of the model's JSON text.
///
/// Unparseable JSON is an upstream failure; a missing or empty field is
/// `None`, which callers answer with the "no result" sentinel.
pub fn extract_transliteration(text: &str) -> Result<Option<String>> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| GranthaError::upstream(format!("Model returned invalid JSON: {e}")))?;
    Ok(value[RESULT_FIELD]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string))
}
