//! `grantha status`: ask a running service for its health report.

use anyhow::Result;
use tracing::debug;

use grantha_core::HEALTH_PATH;
use grantha_gateway::health_api::HealthReport;

use crate::terminal_output::{note_error, note_success};

pub async fn run(server_url: &str) -> Result<bool> {
    let url = format!("{}{}", server_url.trim_end_matches('/'), HEALTH_PATH);
    debug!(url = %url, "Checking service health");

    let response = match reqwest::get(&url).await {
        Ok(response) => response,
        Err(e) => {
            note_error(&format!("Grantha service is not reachable at {server_url}: {e}"));
            return Ok(false);
        }
    };
    if !response.status().is_success() {
        note_error(&format!("Health check failed with status {}", response.status()));
        return Ok(false);
    }

    let report: HealthReport = response.json().await?;
    note_success(&format!("Grantha service at {server_url} is {}", report.status));
    println!("  version  {}", report.version);
    println!("  model    {}", report.model);
    println!("  uptime   {}s", report.uptime_seconds);
    Ok(report.status == "ok")
}
