//! Post-hoc filtering of a merged event collection.
//!
//! A [`FilterSpec`] is a conjunction of up to three constraints: a
//! case-insensitive substring match against the event city, a set of local
//! calendar dates, and a set of local weekdays. Date and weekday checks
//! convert `start_at` into a single caller-supplied time zone for the whole
//! call; the zone is never inferred per event.
//!
//! Matching is restricted to the `city` field (not name or description) to
//! keep results deterministic, and the substring containment is
//! intentionally looser than exact city equality so "san francisco" matches
//! "San Francisco, California".

use std::collections::{BTreeSet, HashSet};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;

use crate::event::EventRecord;

/// Selection criteria for the merged collection.
///
/// An absent/empty dimension means "no constraint on that dimension"; the
/// default value therefore matches everything.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Case-insensitive substring matched against the event city
    pub location: Option<String>,

    /// Local calendar dates; empty = unconstrained
    pub dates: BTreeSet<NaiveDate>,

    /// Local weekdays; empty = unconstrained
    pub weekdays: HashSet<Weekday>,
}

impl FilterSpec {
    /// True when no dimension constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.location.is_none() && self.dates.is_empty() && self.weekdays.is_empty()
    }

    /// Evaluate the conjunctive predicate for one event.
    pub fn matches(&self, event: &EventRecord, tz: Tz) -> bool {
        if let Some(location) = &self.location {
            if !event
                .city
                .to_lowercase()
                .contains(&location.to_lowercase())
            {
                return false;
            }
        }

        if self.dates.is_empty() && self.weekdays.is_empty() {
            return true;
        }

        let local = event.start_at.with_timezone(&tz);

        if !self.dates.is_empty() && !self.dates.contains(&local.date_naive()) {
            return false;
        }

        if !self.weekdays.is_empty() && !self.weekdays.contains(&local.weekday()) {
            return false;
        }

        true
    }

    /// Select the matching subset, preserving input order.
    ///
    /// The input is never mutated; an empty result is a valid result.
    pub fn apply<'a>(&self, events: &'a [EventRecord], tz: Tz) -> Vec<&'a EventRecord> {
        events.iter().filter(|event| self.matches(event, tz)).collect()
    }
}

/// Parse a weekday name, case-insensitively ("Friday", "fri", ...).
pub fn parse_weekday(input: &str) -> Result<Weekday> {
    input
        .parse::<Weekday>()
        .ok()
        .with_context(|| format!("Unknown weekday: {input}"))
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {input}"))
}

/// Parse an IANA time zone name.
pub fn parse_timezone(input: &str) -> Result<Tz> {
    input
        .parse::<Tz>()
        .ok()
        .with_context(|| format!("Unknown IANA time zone: {input}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{DateTime, Utc};

    fn event(id: &str, city: &str, start: &str) -> EventRecord {
        EventRecord {
            id: id.into(),
            name: format!("Event {id}"),
            start_at: start.parse::<DateTime<Utc>>().unwrap(),
            end_at: None,
            city: city.into(),
            source: "tech".into(),
        }
    }

    fn sample_events() -> Vec<EventRecord> {
        vec![
            event("a", "Mountain View, California", "2025-10-09T10:00:00Z"),
            event("b", "San Francisco, California", "2025-10-10T18:00:00Z"),
            event("c", "Unknown", "2025-10-11T02:00:00Z"),
        ]
    }

    #[test]
    fn empty_spec_returns_everything_in_order() {
        let events = sample_events();
        let spec = FilterSpec::default();
        assert!(spec.is_unconstrained());

        let result = spec.apply(&events, chrono_tz::UTC);
        assert_eq!(result.len(), events.len());
        let ids: Vec<&str> = result.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn location_is_case_insensitive_substring() {
        let events = sample_events();
        let spec = FilterSpec {
            location: Some("san francisco".into()),
            ..Default::default()
        };

        let result = spec.apply(&events, chrono_tz::UTC);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "b");
    }

    #[test]
    fn weekday_uses_the_supplied_zone() {
        // 2025-10-10T18:00:00Z is a Friday in UTC and still Friday at 11:00
        // in Los Angeles, but already Saturday 07:00 in Auckland (UTC+13).
        let events = vec![event("b", "San Francisco, California", "2025-10-10T18:00:00Z")];
        let spec = FilterSpec {
            weekdays: [Weekday::Fri].into_iter().collect(),
            ..Default::default()
        };

        let la: Tz = "America/Los_Angeles".parse().unwrap();
        assert_eq!(spec.apply(&events, la).len(), 1);

        let auckland: Tz = "Pacific/Auckland".parse().unwrap();
        assert_eq!(spec.apply(&events, auckland).len(), 0);
    }

    #[test]
    fn date_set_matches_local_calendar_date() {
        let events = sample_events();
        // 2025-10-11T02:00:00Z is still 2025-10-10 in Los Angeles
        let spec = FilterSpec {
            dates: [parse_date("2025-10-10").unwrap()].into_iter().collect(),
            ..Default::default()
        };

        let la: Tz = "America/Los_Angeles".parse().unwrap();
        let ids: Vec<&str> = spec.apply(&events, la).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn dimensions_are_conjunctive() {
        let events = sample_events();
        let spec = FilterSpec {
            location: Some("california".into()),
            weekdays: [Weekday::Thu].into_iter().collect(),
            ..Default::default()
        };

        let result = spec.apply(&events, chrono_tz::UTC);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "a");
    }

    #[test]
    fn filtering_is_idempotent() {
        let events = sample_events();
        let spec = FilterSpec {
            location: Some("california".into()),
            ..Default::default()
        };

        let once: Vec<EventRecord> = spec
            .apply(&events, chrono_tz::UTC)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<EventRecord> = spec
            .apply(&once, chrono_tz::UTC)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let events = sample_events();
        let spec = FilterSpec {
            location: Some("berlin".into()),
            ..Default::default()
        };
        assert!(spec.apply(&events, chrono_tz::UTC).is_empty());
    }

    #[test]
    fn weekday_parsing_accepts_any_case() {
        assert_eq!(parse_weekday("Friday").unwrap(), Weekday::Fri);
        assert_eq!(parse_weekday("friday").unwrap(), Weekday::Fri);
        assert_eq!(parse_weekday("MON").unwrap(), Weekday::Mon);
        assert!(parse_weekday("someday").is_err());
    }

    #[test]
    fn date_parsing_requires_iso_dates() {
        assert!(parse_date("2025-10-10").is_ok());
        assert!(parse_date("10/10/2025").is_err());
    }

    #[test]
    fn timezone_parsing() {
        assert!(parse_timezone("America/Los_Angeles").is_ok());
        assert!(parse_timezone("Nowhere/Special").is_err());
    }
}
