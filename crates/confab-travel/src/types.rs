//! Travel service errors.

use thiserror::Error;

/// Errors from the distance provider.
///
/// Absorbed per city by the summarizer: a failed lookup marks that city's
/// entry `ERROR` and nothing else.
#[derive(Debug, Error)]
pub enum TravelError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Distance API error: {0}")]
    Api(String),

    #[error("Distance API key not configured (set {0})")]
    MissingApiKey(&'static str),
}
