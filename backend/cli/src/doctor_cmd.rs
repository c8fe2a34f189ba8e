//! `grantha doctor`: check the environment for both the service and the
//! batch client.

use anyhow::Result;

use grantha_config::{validate_client, validate_service, ClientConfig, ServiceConfig, ValidationReport};

/// Executes the full diagnosis. Returns whether nothing blocking was found.
pub async fn run(client: &ClientConfig) -> Result<bool> {
    println!("\nRunning Grantha doctor...\n");

    println!("Recognition service (grantha serve):");
    let service_ok = match ServiceConfig::from_env() {
        Ok(config) => print_report(&validate_service(&config)),
        Err(e) => {
            println!("  🔴 {e}");
            false
        }
    };

    println!("\nBatch client (grantha process):");
    let client_ok = print_report(&validate_client(client));
    if client_ok {
        println!("\nService at {}:", client.server_url);
        crate::status_cmd::run(&client.server_url).await?;
    }

    println!();
    if service_ok && client_ok {
        println!("✅ Configuration looks good.");
    } else {
        println!("❌ Some checks failed. Fix the errors above.");
    }
    Ok(service_ok && client_ok)
}

fn print_report(report: &ValidationReport) -> bool {
    for error in &report.errors {
        println!("  🔴 {}: {}", error.path, error.message);
    }
    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("  🟢 ok");
    }
    report.is_valid()
}
