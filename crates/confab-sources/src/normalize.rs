//! Raw-entry to canonical-event conversion.
//!
//! Pure functions, no IO. A record missing a parseable start timestamp is
//! dropped (returns `None`); everything else degrades field by field: a
//! missing city becomes the sentinel, a missing name stays empty.

use chrono::{DateTime, NaiveDateTime, Utc};

use confab_core::config::SourceRef;
use confab_core::{EventRecord, UNKNOWN_CITY};

use crate::types::{CalendarInfo, CalendarItemEntry, DiscoverEntry, GeoAddressInfo, RawEntry};

/// Convert one raw entry into the canonical shape, or drop it.
pub fn normalize_entry(entry: &RawEntry, source: &SourceRef) -> Option<EventRecord> {
    match entry {
        RawEntry::Discover(entry) => normalize_discover(entry, source),
        RawEntry::CalendarItem(entry) => normalize_calendar_item(entry, source),
    }
}

fn normalize_discover(entry: &DiscoverEntry, source: &SourceRef) -> Option<EventRecord> {
    let body = entry.event.as_ref();

    let start_at = match body
        .and_then(|b| b.start_at.as_deref())
        .and_then(parse_timestamp)
    {
        Some(start_at) => start_at,
        None => {
            tracing::debug!(source = %source, "Dropping record without a parseable start timestamp");
            return None;
        }
    };

    Some(EventRecord {
        id: body.and_then(|b| b.api_id.clone()).unwrap_or_default(),
        name: body.and_then(|b| b.name.clone()).unwrap_or_default(),
        start_at,
        end_at: body.and_then(|b| b.end_at.as_deref()).and_then(parse_timestamp),
        city: discover_city(
            body.and_then(|b| b.geo_address_info.as_ref()),
            entry.calendar.as_ref(),
        ),
        source: source.label().to_string(),
    })
}

fn normalize_calendar_item(entry: &CalendarItemEntry, source: &SourceRef) -> Option<EventRecord> {
    let body = entry.event.as_ref();

    let start_raw = body
        .and_then(|b| b.start_at.as_deref())
        .or(entry.start_at.as_deref());
    let start_at = match start_raw.and_then(parse_timestamp) {
        Some(start_at) => start_at,
        None => {
            tracing::debug!(source = %source, "Dropping record without a parseable start timestamp");
            return None;
        }
    };

    Some(EventRecord {
        id: body
            .and_then(|b| b.api_id.clone())
            .or_else(|| entry.api_id.clone())
            .unwrap_or_default(),
        name: body.and_then(|b| b.name.clone()).unwrap_or_default(),
        start_at,
        end_at: body.and_then(|b| b.end_at.as_deref()).and_then(parse_timestamp),
        city: geo_city(body.and_then(|b| b.geo_address_info.as_ref())),
        source: source.label().to_string(),
    })
}

/// Parse an upstream timestamp: RFC 3339 first, then the fractional-seconds
/// `Z`-suffixed form some records carry.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.fZ")
        .ok()
        .map(|naive| naive.and_utc())
}

/// City for a discovery entry: event-level location first, then the
/// calendar-level fallback, then the generic chain.
fn discover_city(geo: Option<&GeoAddressInfo>, calendar: Option<&CalendarInfo>) -> String {
    // "City, State" strings geocode most reliably, so they win outright.
    if let Some(city_state) = geo.and_then(|g| nonempty(g.city_state.as_deref())) {
        return city_state.to_string();
    }

    if let Some(calendar) = calendar {
        if let Some(city) = nonempty(calendar.geo_city.as_deref()) {
            let region = nonempty(calendar.geo_region_abbrev.as_deref())
                .or_else(|| nonempty(calendar.geo_region.as_deref()));
            return match region {
                Some(region) => format!("{city}, {region}"),
                None => city.to_string(),
            };
        }
    }

    geo_city(geo)
}

/// Generic city chain over the event-level location object.
fn geo_city(geo: Option<&GeoAddressInfo>) -> String {
    let Some(geo) = geo else {
        return UNKNOWN_CITY.to_string();
    };

    if let Some(city_state) = nonempty(geo.city_state.as_deref()) {
        return city_state.to_string();
    }

    if let Some(city) = nonempty(geo.city.as_deref()) {
        let region =
            nonempty(geo.region.as_deref()).or_else(|| nonempty(geo.region_abbrev.as_deref()));
        return match region {
            Some(region) => format!("{city}, {region}"),
            None => city.to_string(),
        };
    }

    // Last resort: pull "City, State" out of the full address.
    if let Some(full) = nonempty(geo.full_address.as_deref()) {
        let parts: Vec<&str> = full.split(',').map(str::trim).collect();
        if parts.len() >= 2 {
            return format!("{}, {}", parts[0], parts[1]);
        }
        if let Some(first) = parts.first() {
            if !first.is_empty() {
                return (*first).to_string();
            }
        }
    }

    UNKNOWN_CITY.to_string()
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
