mod doctor_cmd;
mod process_cmd;
mod status_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use grantha_config::{log_report, redact, validate_client, validate_service, ClientConfig, ServiceConfig};
use grantha_gateway::{start_server, GatewayState};
use grantha_logging::init_logger;
use grantha_understanding::GeminiTransliterator;

#[derive(Parser)]
#[command(name = "grantha")]
#[command(about = "Grantha OCR: transliterate manuscript images into Tamil Grantha script")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the recognition service (requires API_KEY)
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Transliterate image files through a running service
    Process {
        /// Image files or directories of images
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Recognition service base URL
        #[arg(short, long)]
        server: Option<String>,
        /// Maximum images in flight at once
        #[arg(short, long)]
        concurrency: Option<usize>,
        /// Per-image timeout in seconds (0 disables)
        #[arg(short, long)]
        timeout: Option<u64>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
        /// Show service logs while processing
        #[arg(short, long)]
        verbose: bool,
    },
    /// Check that the recognition service is up
    Status {
        #[arg(short, long)]
        server: Option<String>,
    },
    /// Check configuration for the service and the client
    Doctor,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Serve { port } => {
            run_server(port).await?;
            true
        }
        Commands::Process {
            files,
            server,
            concurrency,
            timeout,
            json,
            verbose,
        } => {
            let config = client_config(server, concurrency, timeout)?;
            init_logger(if verbose { &config.log_level } else { "warn" }, None);
            if !log_report(&validate_client(&config)) {
                bail!("invalid client configuration");
            }
            process_cmd::run(&files, &config, json).await?
        }
        Commands::Status { server } => {
            let config = client_config(server, None, None)?;
            init_logger("warn", None);
            status_cmd::run(&config.server_url).await?
        }
        Commands::Doctor => {
            let config = client_config(None, None, None)?;
            init_logger("warn", None);
            doctor_cmd::run(&config).await?
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Environment first, then command-line overrides.
fn client_config(
    server: Option<String>,
    concurrency: Option<usize>,
    timeout: Option<u64>,
) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("invalid client configuration")?;
    if let Some(server) = server {
        config.server_url = server;
    }
    if let Some(concurrency) = concurrency {
        config.max_concurrency = concurrency;
    }
    if let Some(timeout) = timeout {
        config.request_timeout_secs = timeout;
    }
    Ok(config)
}

async fn run_server(port: Option<u16>) -> Result<()> {
    // A missing API_KEY ends the process here, before anything binds.
    let mut config = ServiceConfig::from_env().context("cannot start the recognition service")?;
    if let Some(port) = port {
        config.port = port;
    }

    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    init_logger(&config.log_level, config.log_dir.as_deref());

    if !log_report(&validate_service(&config)) {
        bail!("invalid service configuration");
    }
    info!(
        config = %redact(&serde_json::to_value(&config)?),
        "Starting Grantha recognition service"
    );

    let model = GeminiTransliterator::new(config.api_key.clone(), config.model.clone());
    start_server(&config, GatewayState::new(Arc::new(model))).await
}
