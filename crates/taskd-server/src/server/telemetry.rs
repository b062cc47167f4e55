//! Tracing subscriber setup.
//!
//! Logs go to stdout via `tracing_subscriber::fmt`, filtered by `RUST_LOG`
//! when set. With `--log-json` the fmt layer emits one JSON object per event,
//! which is what the log pipeline expects in deployed environments.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::server::config::ServerConfig;

pub fn init_telemetry(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskd_server=debug,tower_http=debug,info".into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_thread_ids(true)
                    .with_target(true),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_thread_ids(true)
                    .with_target(true),
            )
            .init();
    }
}
