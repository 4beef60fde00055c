//! Canonical event representation.
//!
//! Every upstream record shape is normalized into [`EventRecord`] before it
//! enters the pipeline; everything downstream (sorting, summarizing,
//! filtering, snapshots) only ever sees this shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel city used when an event carries no usable location data.
pub const UNKNOWN_CITY: &str = "Unknown";

/// A normalized, source-agnostic event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Source-scoped identifier
    pub id: String,

    /// Display title (empty when the upstream record has none)
    pub name: String,

    /// Start of the event, always UTC; records without one are dropped
    /// during normalization and never reach this type
    pub start_at: DateTime<Utc>,

    /// End of the event; absent for ongoing/unspecified events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,

    /// Derived city, or [`UNKNOWN_CITY`]
    pub city: String,

    /// Originating slug or calendar name. Provenance only, never used for
    /// dedup
    pub source: String,
}
