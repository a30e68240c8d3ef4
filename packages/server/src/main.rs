use std::sync::Arc;

use lapin::{Connection, ConnectionProperties};
use mq::{AmqpChannelPool, AmqpPublisher, ChannelPool};
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::database::init_db;
use server::repository::DbSubmissionRepository;
use server::services::submission::SubmissionService;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Arc::new(AppConfig::load()?);

    let db = init_db(&config.database.url).await?;
    info!("Database ready");

    let connection =
        Connection::connect(&config.mq.url, ConnectionProperties::default()).await?;
    // A partially built pool is never returned; any channel failure here
    // aborts startup.
    let pool: Arc<AmqpChannelPool> =
        Arc::new(ChannelPool::open(connection, config.mq.pool_size).await?);

    let publisher = Arc::new(AmqpPublisher::new(pool.clone()));
    let repo = Arc::new(DbSubmissionRepository::new(db));
    let submissions = Arc::new(SubmissionService::new(
        repo,
        publisher,
        config.mq.queue_name.clone(),
    ));

    let state = AppState {
        submissions,
        config: config.clone(),
    };

    let app = server::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
