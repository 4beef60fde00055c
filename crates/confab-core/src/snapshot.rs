//! Snapshot persistence boundary.
//!
//! Two flat JSON documents per aggregation run: the combined-events array
//! (sorted ascending by `start_at`) and the city-summary map. Timestamps are
//! ISO-8601 UTC strings.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::event::EventRecord;
use crate::summary::CitySummary;

/// Write the combined-events document.
pub fn write_events(path: &Path, events: &[EventRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let contents =
        serde_json::to_string_pretty(events).context("Failed to serialize combined events")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Load a combined-events document written by [`write_events`].
pub fn load_events(path: &Path) -> Result<Vec<EventRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse combined events in {}", path.display()))
}

/// Write the city-summary document.
pub fn write_summary(path: &Path, summary: &BTreeMap<String, CitySummary>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let contents =
        serde_json::to_string_pretty(summary).context("Failed to serialize city summary")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
