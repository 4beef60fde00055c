//! Centralized error types for the Confab pipeline.
//!
//! Per-service errors live in their own crates (source fetching, travel
//! lookups); this module holds the taxonomy the application surfaces to the
//! user. Only [`AppError::NoEventsProduced`] is fatal for an aggregation
//! run; everything else is absorbed and reported along the way.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No events were produced by any configured source")]
    NoEventsProduced,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for terminal output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => e.user_message().to_string(),
            AppError::NoEventsProduced => {
                "No events were collected from any source. Check your sources and network."
                    .to_string()
            }
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
            AppError::Other(e) => format!("{e:#}"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}
