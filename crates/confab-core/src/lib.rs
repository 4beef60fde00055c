pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod snapshot;
pub mod summary;

pub use config::{CalendarSource, Config, GeoBounds, SourceRef};
pub use error::{AppError, ConfigError};
pub use event::{EventRecord, UNKNOWN_CITY};
pub use filter::FilterSpec;
pub use summary::{CitySummary, STATUS_ERROR, STATUS_OK, STATUS_SKIPPED};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::debug!("Confab core initialized");
    Ok(())
}
