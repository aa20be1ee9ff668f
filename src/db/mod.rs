use crate::errors::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;

pub mod queries;


/// Initialize the SQLite connection pool with appropriate options.
///
/// # Arguments
///
/// * `database_url` - The database URL string.
/// * `max_connections` - Upper bound on pooled connections.
///
/// # Returns
/// * `Result<Pool<Sqlite>, AppError>` - The initialized SQLite connection pool.
pub async fn init_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<Pool<Sqlite>, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
