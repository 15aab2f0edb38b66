//! # Internal Chat
//!
//! Entry point: initializes tracing, loads configuration, connects to
//! PostgreSQL and serves the chat HTTP API.

use anyhow::Result;
use tracing::info;

use internal_chat::config::Settings;
use internal_chat::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    internal_chat::telemetry::init_tracing();

    info!("Starting internal chat...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
