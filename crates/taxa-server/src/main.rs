//! Taxa Server - Main entry point

use anyhow::Result;
use taxa_common::logging::{init_logging, LogConfig};
use tracing::info;

use taxa_server::{api, config::Config, db};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig {
        log_file_prefix: "taxa-server".to_string(),
        filter_directives: Some("taxa_server=debug,tower_http=debug,sqlx=warn".to_string()),
        ..LogConfig::default()
    }
    .with_env_overrides()?;

    let _guard = init_logging(&log_config)?;

    info!("Starting Taxa Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&db::DbConfig::from(&config.database)).await?;
    info!("Database connection pool established");

    db::run_migrations(&pool).await?;

    api::serve(pool, &config).await
}
