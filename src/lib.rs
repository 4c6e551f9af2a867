pub mod config;
pub mod db;
pub mod elevation;
pub mod error;
pub mod export;
pub mod models;
pub mod server;
pub mod sessions;
pub mod store;
pub mod tls;
pub mod views;

pub use config::{Config, DatabaseConfig};
pub use db::{create_db, empty_db, establish_connection, establish_pool, PgLogStore};
pub use error::{Error, StoreError};
pub use models::{LogEntry, NewLogEntry, SessionSummary};
pub use store::{LogStore, MemoryLogStore};

/// Install the `tracing` subscriber used by all binaries. `RUST_LOG`
/// overrides the default `info` level.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
