//! Per-city aggregates with optional travel enrichment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::EventRecord;

/// The distance lookup succeeded and all metric fields are populated.
pub const STATUS_OK: &str = "OK";
/// No lookup was attempted (no origin, no API key, or the sentinel city).
pub const STATUS_SKIPPED: &str = "SKIPPED";
/// The lookup failed at the transport or API level.
pub const STATUS_ERROR: &str = "ERROR";

/// One entry of the city-summary document.
///
/// `event_count` is always present and correct; the remaining fields exist
/// only when a distance lookup succeeded. Non-`OK` upstream element statuses
/// (e.g. `NOT_FOUND`) are passed through in `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySummary {
    pub event_count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
}

impl CitySummary {
    /// A count-only entry with the given status and no metric fields.
    pub fn counted(event_count: usize, status: &str) -> Self {
        Self {
            event_count,
            status: Some(status.to_string()),
            distance_text: None,
            distance_meters: None,
            distance_miles: None,
            duration_text: None,
            duration_seconds: None,
            duration_minutes: None,
        }
    }
}

/// Count events per distinct city, preserving nothing but totals.
///
/// The map is ordered by city name so the summary document is deterministic
/// regardless of lookup completion order.
pub fn count_by_city(events: &[EventRecord]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(event.city.clone()).or_insert(0) += 1;
    }
    counts
}
