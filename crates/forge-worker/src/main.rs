use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use forge_worker::config::WorkerConfig;
use forge_worker::delivery::{pull::PullSubscriber, push};
use forge_worker::state::AppState;
use sea_orm_migration::MigratorTrait;

async fn init_db_and_migrate(config: &WorkerConfig) -> anyhow::Result<AppState> {
    let db = forge_db::connect(&config.database_url)
        .await
        .context("connecting to database")?;

    // Apply migrations on boot (idempotent).
    forge_migration::Migrator::up(&db, None)
        .await
        .context("applying migrations")?;

    Ok(AppState {
        db: Arc::new(db),
        settings: config.settings,
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = WorkerConfig::from_env()?;
    let state = init_db_and_migrate(&config).await?;

    // Local development only: the emulator cannot push to us.
    if let Some(pull) = &config.pull {
        tracing::info!(
            emulator = %pull.emulator_host,
            subscription = %pull.subscription,
            "pull delivery enabled"
        );
        PullSubscriber::new(pull, state.clone())?.spawn();
    }

    let app = push::router(state);
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    tracing::info!(%addr, "forge-worker HTTP listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
