use models::{CliApp, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod activity_log;
mod cli;
mod config;
mod cycle;
mod email_sender;
mod models;
mod ollama;
mod profile;
mod resume;

use config::{load_config, Config};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config.yml: {}. Using defaults.", e);
            Config::default()
        }
    };

    // Setup logging
    std::env::set_var("RUST_LOG", "recruit_mailer=info,hyper=warn,lettre=warn");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("recruit_mailer=info".parse().unwrap()),
        )
        .with_max_level(tracing::Level::INFO)
        .init();

    // Make sure the resume folder exists before the first scan
    tokio::fs::create_dir_all(&config.storage.resume_directory).await?;

    info!("Initializing email agent...");
    let app = CliApp::new(config).await?;

    // Add graceful shutdown
    tokio::select! {
        result = app.run() => {
            result?;
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
