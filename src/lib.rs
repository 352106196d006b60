//! Biblio client state layer
//!
//! Client-side state synchronization for a library checkout application:
//! an in-memory mirror of the authenticated session and the book catalog,
//! kept consistent with the checkout server over HTTP and exposed as one
//! atomically-updated snapshot.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod token;

pub use api::{ApiClient, LibraryApi};
pub use config::AppConfig;
pub use error::{ApiError, AppError, AppResult, FailureKind, RequestError};
pub use store::{Action, AppState, RequestStatus, Store};
pub use token::{MemoryTokenStore, TokenStore};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing output from the logging configuration.
///
/// Intended for application startup; library code only emits events.
pub fn init_tracing(config: &config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblio_client={}", config.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
