//! Travel enrichment for the city summary.
//!
//! Origin detection from the caller's IP, a distance-matrix client, and the
//! summarizer that combines per-city event counts with travel legs. All of
//! it is optional decoration: the summary's counts never depend on any of
//! these lookups succeeding.

pub mod location;
pub mod matrix;
pub mod summarize;
pub mod types;

pub use location::detect_origin;
pub use matrix::{DistanceClient, Leg};
pub use summarize::summarize;
pub use types::TravelError;
