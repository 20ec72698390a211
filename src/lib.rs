//! Data layer for an Xtream-compatible IPTV player: provider and TMDB
//! clients, a SQLite-backed catalog store with live query subscriptions,
//! and the sync service that ties them together.

pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;

pub use config::Config;
pub use db::{Store, Table};
pub use services::{SyncError, SyncService, SyncSummary};

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. `RUST_LOG` wins over the
/// given directives; calling this twice is harmless.
pub fn init_tracing(default_directives: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok();
}
