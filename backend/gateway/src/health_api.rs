//! `GET /api/health`

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
    pub model: String,
    pub uptime_seconds: u64,
}

pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".into(),
        service: "grantha".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        model: state.model.name().to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
