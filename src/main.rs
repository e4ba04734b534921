mod alertas;
mod config;
mod db;
mod error;
mod http;
mod models;
mod mqtt;
mod processor;

use config::AppConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    info!("Starting Insectos Monitor Service...");

    // Init DB
    let pool = db::init_pool(&config.database_url).await?;
    info!("Connected to database");

    // Start MQTT ingestion alongside the HTTP API
    let mqtt_config = config.clone();
    let mqtt_pool = pool.clone();
    tokio::spawn(async move {
        if let Err(e) = mqtt::start_mqtt_client(&mqtt_config, mqtt_pool).await {
            error!("MQTT client terminated: {}", e);
        }
    });

    http::serve(&config.http_addr, pool).await
}
