mod client;
mod config;
mod constants;
mod formatters;
mod handlers;
mod models;
mod overview;
mod service;
mod validation;

use anyhow::Result;
use rmcp::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::overview::CountryTable;
use crate::service::Weather;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the MCP protocol, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcp_weather_tools=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let countries = CountryTable::default();
    tracing::info!(
        "Starting MCP weather server (api: {}, attempts: {}, countries: {})",
        config.api_base,
        config.retry.max_attempts,
        countries.len()
    );

    let weather = Weather::new(&config, countries)?;
    let server = weather.serve(rmcp::transport::stdio()).await?;
    server.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
