//! Raw upstream record shapes.
//!
//! The two endpoints return structurally different entries, so each keeps
//! its own deserialization struct and the pair is carried through the
//! pipeline as a tagged [`RawEntry`]; the normalizer dispatches on the tag
//! instead of duck-typing across arbitrary nesting. Unknown upstream fields
//! are ignored.

use serde::Deserialize;

/// One page of either endpoint's pagination contract.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<E> {
    #[serde(default)]
    pub entries: Vec<E>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A raw entry tagged with the endpoint shape it came from.
#[derive(Debug, Clone)]
pub enum RawEntry {
    /// From the slug-keyed discovery endpoint
    Discover(DiscoverEntry),
    /// From the calendar-id-keyed item endpoint
    CalendarItem(CalendarItemEntry),
}

/// Discovery entries nest the event body and may carry calendar-level
/// location data usable as a fallback when the event itself has none.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverEntry {
    pub event: Option<EventBody>,
    pub calendar: Option<CalendarInfo>,
}

/// Item entries nest the event body too, but occasionally surface the id
/// and start timestamp at the top level instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarItemEntry {
    pub api_id: Option<String>,
    pub start_at: Option<String>,
    pub event: Option<EventBody>,
}

/// The nested event object common to both entry shapes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventBody {
    pub api_id: Option<String>,
    pub name: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub geo_address_info: Option<GeoAddressInfo>,
}

/// Nested location data attached to an event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoAddressInfo {
    pub city: Option<String>,
    pub city_state: Option<String>,
    pub region: Option<String>,
    pub region_abbrev: Option<String>,
    pub full_address: Option<String>,
}

/// Calendar-level location data on discovery entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarInfo {
    pub name: Option<String>,
    pub geo_city: Option<String>,
    pub geo_region: Option<String>,
    pub geo_region_abbrev: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn discover_page_deserializes_with_unknown_fields() {
        let json = r#"{
            "entries": [
                {
                    "event": {
                        "api_id": "evt-1",
                        "name": "Rust Meetup",
                        "start_at": "2025-10-10T18:00:00Z",
                        "geo_address_info": {"city_state": "San Francisco, California"},
                        "cover_url": "https://example.com/img.png"
                    },
                    "calendar": {"name": "tech", "geo_city": "San Francisco"}
                }
            ],
            "has_more": true,
            "next_cursor": "cur-2"
        }"#;

        let page: Page<DiscoverEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(page.entries.len(), 1);
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("cur-2"));

        let event = page.entries[0].event.as_ref().unwrap();
        assert_eq!(event.api_id.as_deref(), Some("evt-1"));
        assert_eq!(
            event.geo_address_info.as_ref().unwrap().city_state.as_deref(),
            Some("San Francisco, California")
        );
    }

    #[test]
    fn page_fields_default_when_absent() {
        let page: Page<CalendarItemEntry> = serde_json::from_str("{}").unwrap();
        assert!(page.entries.is_empty());
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn calendar_item_allows_top_level_start() {
        let json = r#"{"api_id": "evt-9", "start_at": "2025-10-09T10:00:00Z"}"#;
        let entry: CalendarItemEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.start_at.as_deref(), Some("2025-10-09T10:00:00Z"));
        assert!(entry.event.is_none());
    }
}
