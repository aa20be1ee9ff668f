use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_api::{api, config::Config, db, service::TaskService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Task API...");

    let pool = db::init_pool(&config.db_url, config.db_max_connections)
        .await
        .with_context(|| format!("failed to open database at {}", config.db_url))?;

    tracing::info!("Database connection pool established.");

    db::run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;
    tracing::info!("Migrations applied successfully.");

    let service = TaskService::new(pool.clone());
    tracing::info!("Task service initialized.");

    let app = api::router(service);
    let addr = config.server_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("API Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Application shut down gracefully.");

    Ok(())
}

/// Resolves when Ctrl+C or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received.");
}
