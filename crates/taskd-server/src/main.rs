use clap::Parser;
use taskd_server::server::config::{CliArgs, ServerConfig};
use taskd_server::server::service::handler::{TodoService, router};
use taskd_server::server::store::{PgTodoStore, connect_pool};
use taskd_server::server::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_telemetry(&config);

    // A bad database configuration is a startup error, not a runtime one.
    let pool = connect_pool(&config).await?;
    let store = PgTodoStore::new(pool);

    let service = TodoService::new(store, &config);
    let bulk = service.bulk();
    let app = router(service);

    let listener = TcpListener::bind(&config.server_addr).await?;
    log_startup_info(&config);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The listener has stopped accepting; drain the bulk pipeline.
    bulk.shutdown().await;

    tracing::info!("Service shut down successfully");
    Ok(())
}

fn log_startup_info(config: &ServerConfig) {
    if cfg!(debug_assertions) {
        tracing::info!(
            "Starting todo service on {} with full config: {:#?}",
            config.server_addr,
            config
        );
    } else {
        tracing::info!(
            addr = %config.server_addr,
            db_host = %config.db_host,
            db_port = config.db_port,
            "Starting todo service"
        );
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");
}
