//! `POST /api/generate`: one image in, one transliteration out.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, error, info, warn};

use grantha_core::{
    GenerateRequestBody, GenerateResponse, GranthaError, MISSING_FIELDS_MESSAGE, NO_RESULT_TEXT,
};
use grantha_logging::redact_sensitive_data;

use crate::error::{ApiError, PAYLOAD_TOO_LARGE_MESSAGE};
use crate::server::GatewayState;

pub async fn generate(
    State(state): State<GatewayState>,
    payload: Result<Json<GenerateRequestBody>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            warn!("Rejected oversized generate request");
            ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE_MESSAGE)
        } else {
            debug!(reason = %rejection.body_text(), "Unreadable generate request");
            missing_fields()
        }
    })?;

    let Some((image, mime_type)) = body.fields() else {
        return Err(missing_fields());
    };

    info!(
        model = %state.model.name(),
        mime = %mime_type,
        payload_len = image.len(),
        "Transliterating image"
    );

    match state.model.transliterate(image, mime_type).await {
        Ok(Some(text)) => Ok(Json(GenerateResponse::text(text))),
        Ok(None) => {
            info!("Model returned no transliteration");
            Ok(Json(GenerateResponse::text(NO_RESULT_TEXT)))
        }
        Err(e) => {
            error!(
                model = %state.model.name(),
                error = %redact_sensitive_data(&e.to_string()),
                "Vision model call failed"
            );
            Err(ApiError::from(e))
        }
    }
}

fn missing_fields() -> ApiError {
    GranthaError::Validation(MISSING_FIELDS_MESSAGE.to_string()).into()
}
