use sentinel_fw_domain::config::DatabaseConfig;
use sentinel_fw_infrastructure::store::{create_read_pool, create_write_pool};
use sqlx::SqlitePool;
use tracing::{error, info};

pub async fn init_database(database_url: &str, cfg: &DatabaseConfig) -> anyhow::Result<(SqlitePool, SqlitePool)> {
    info!(database_url, "initializing database");

    let write_pool = create_write_pool(database_url, cfg).await.map_err(|e| {
        error!("failed to initialize write pool: {}", e);
        anyhow::anyhow!(e)
    })?;

    let read_pool = create_read_pool(database_url, cfg).await.map_err(|e| {
        error!("failed to initialize read pool: {}", e);
        anyhow::anyhow!(e)
    })?;

    info!(
        write_pool_max = cfg.write_pool_max_connections,
        read_pool_max = cfg.read_pool_max_connections,
        "database initialized successfully"
    );

    Ok((write_pool, read_pool))
}
