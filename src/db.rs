use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;
use crate::error::AppError;

/// Opens the connection pool and brings the schema up to date.
pub async fn connect(config: &Config) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database ready ({} max connections)", config.max_connections);

    Ok(pool)
}
