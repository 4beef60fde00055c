//! Upstream source fetching, normalization, and concurrent aggregation.
//!
//! One [`SourceClient`] pages through the two upstream endpoint shapes and
//! yields raw entries; [`normalize`] maps them into the canonical
//! [`confab_core::EventRecord`]; [`aggregate`] fans out over every configured
//! source and merges the survivors into one sorted collection.

pub mod aggregate;
pub mod client;
pub mod error;
pub mod normalize;
pub mod retry;
pub mod types;

pub use aggregate::{aggregate, AggregateOutcome, FailedSource};
pub use client::SourceClient;
pub use error::SourceError;
pub use retry::RetryConfig;
pub use types::RawEntry;
