//! City summarizer with optional travel enrichment.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};

use confab_core::summary::count_by_city;
use confab_core::{
    CitySummary, EventRecord, STATUS_ERROR, STATUS_OK, STATUS_SKIPPED, UNKNOWN_CITY,
};

use crate::matrix::{DistanceClient, Leg};
use crate::types::TravelError;

/// Upper bound on distance lookups in flight, to respect provider limits.
const MAX_LOOKUPS_IN_FLIGHT: usize = 4;

const METERS_PER_MILE: f64 = 1609.344;

/// Build the city summary for a merged collection.
///
/// Counts are always complete. When both an origin and a client are
/// available, each distinct non-sentinel city gets exactly one distance
/// lookup; per-city failures mark that entry `ERROR` and nothing else.
/// Without an origin or client every entry is `SKIPPED`.
pub async fn summarize(
    events: &[EventRecord],
    origin: Option<&str>,
    client: Option<&DistanceClient>,
) -> BTreeMap<String, CitySummary> {
    let counts = count_by_city(events);

    let (origin, client) = match (origin, client) {
        (Some(origin), Some(client)) => (origin, client),
        _ => {
            tracing::info!(cities = counts.len(), "No origin available; skipping distance lookups");
            return counts
                .into_iter()
                .map(|(city, count)| (city, CitySummary::counted(count, STATUS_SKIPPED)))
                .collect();
        }
    };

    tracing::info!(cities = counts.len(), origin, "Querying distances per city");

    // Independent lookups, bounded in-flight; completion order does not
    // matter because results are keyed back into the ordered map.
    let mut legs: BTreeMap<String, Result<Leg, TravelError>> = stream::iter(
        counts
            .keys()
            .filter(|city| city.as_str() != UNKNOWN_CITY)
            .cloned()
            .map(|city| async move {
                let result = client.distance_matrix(origin, &city).await;
                (city, result)
            }),
    )
    .buffer_unordered(MAX_LOOKUPS_IN_FLIGHT)
    .collect()
    .await;

    counts
        .into_iter()
        .map(|(city, count)| {
            let entry = entry_for_city(&city, count, legs.remove(&city));
            (city, entry)
        })
        .collect()
}

fn entry_for_city(
    city: &str,
    count: usize,
    lookup: Option<Result<Leg, TravelError>>,
) -> CitySummary {
    if city == UNKNOWN_CITY {
        return CitySummary::counted(count, STATUS_SKIPPED);
    }

    match lookup {
        Some(Ok(leg)) if leg.is_ok() => CitySummary {
            event_count: count,
            status: Some(STATUS_OK.to_string()),
            distance_miles: leg
                .distance_meters
                .map(|meters| round_to(meters as f64 / METERS_PER_MILE, 100.0)),
            duration_minutes: leg
                .duration_seconds
                .map(|seconds| round_to(seconds as f64 / 60.0, 10.0)),
            distance_text: leg.distance_text,
            distance_meters: leg.distance_meters,
            duration_text: leg.duration_text,
            duration_seconds: leg.duration_seconds,
        },
        Some(Ok(leg)) => CitySummary::counted(count, &leg.status),
        Some(Err(error)) => {
            tracing::warn!(city, error = %error, "Distance lookup failed");
            CitySummary::counted(count, STATUS_ERROR)
        }
        None => CitySummary::counted(count, STATUS_ERROR),
    }
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{DateTime, Utc};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn event(city: &str, start: &str) -> EventRecord {
        EventRecord {
            id: format!("evt-{}-{start}", city.len()),
            name: "Event".into(),
            start_at: start.parse::<DateTime<Utc>>().unwrap(),
            end_at: None,
            city: city.into(),
            source: "tech".into(),
        }
    }

    fn sample_events() -> Vec<EventRecord> {
        vec![
            event("San Francisco, California", "2025-10-09T10:00:00Z"),
            event("San Francisco, California", "2025-10-10T18:00:00Z"),
            event("Mountain View, California", "2025-10-11T09:00:00Z"),
            event(UNKNOWN_CITY, "2025-10-12T09:00:00Z"),
        ]
    }

    fn matrix_body(meters: u64, seconds: u64) -> serde_json::Value {
        serde_json::json!({
            "status": "OK",
            "rows": [{
                "elements": [{
                    "status": "OK",
                    "distance": {"text": format!("{meters} m"), "value": meters},
                    "duration": {"text": format!("{seconds} s"), "value": seconds}
                }]
            }]
        })
    }

    #[tokio::test]
    async fn no_origin_skips_enrichment_but_keeps_counts() {
        let events = sample_events();
        let summary = summarize(&events, None, None).await;

        assert_eq!(summary.len(), 3);
        assert_eq!(summary["San Francisco, California"].event_count, 2);
        assert_eq!(summary[UNKNOWN_CITY].event_count, 1);
        for entry in summary.values() {
            assert_eq!(entry.status.as_deref(), Some(STATUS_SKIPPED));
            assert_eq!(entry.distance_meters, None);
        }
        let total: usize = summary.values().map(|e| e.event_count).sum();
        assert_eq!(total, events.len());
    }

    #[tokio::test]
    async fn successful_lookups_populate_metrics() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/distancematrix/json"))
            .and(query_param("destinations", "San Francisco, California"))
            .respond_with(ResponseTemplate::new(200).set_body_json(matrix_body(16093, 1380)))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/maps/api/distancematrix/json"))
            .and(query_param("destinations", "Mountain View, California"))
            .respond_with(ResponseTemplate::new(200).set_body_json(matrix_body(32187, 2400)))
            .mount(&server)
            .await;

        let client = DistanceClient::new_with_base_url(&server.uri(), "test-key").unwrap();
        let events = sample_events();
        let summary = summarize(&events, Some("Oakland, CA"), Some(&client)).await;

        let sf = &summary["San Francisco, California"];
        assert_eq!(sf.status.as_deref(), Some(STATUS_OK));
        assert_eq!(sf.distance_meters, Some(16093));
        assert_eq!(sf.distance_miles, Some(10.0));
        assert_eq!(sf.duration_minutes, Some(23.0));

        // The sentinel city is never looked up.
        assert_eq!(summary[UNKNOWN_CITY].status.as_deref(), Some(STATUS_SKIPPED));

        let total: usize = summary.values().map(|e| e.event_count).sum();
        assert_eq!(total, events.len());
    }

    #[tokio::test]
    async fn failed_lookup_marks_only_that_city() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/distancematrix/json"))
            .and(query_param("destinations", "San Francisco, California"))
            .respond_with(ResponseTemplate::new(200).set_body_json(matrix_body(16093, 1380)))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/maps/api/distancematrix/json"))
            .and(query_param("destinations", "Mountain View, California"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = DistanceClient::new_with_base_url(&server.uri(), "test-key").unwrap();
        let events = sample_events();
        let summary = summarize(&events, Some("Oakland, CA"), Some(&client)).await;

        assert_eq!(
            summary["San Francisco, California"].status.as_deref(),
            Some(STATUS_OK)
        );
        let mv = &summary["Mountain View, California"];
        assert_eq!(mv.status.as_deref(), Some(STATUS_ERROR));
        assert_eq!(mv.distance_meters, None);
        assert_eq!(mv.event_count, 1);
    }

    #[tokio::test]
    async fn non_ok_element_status_is_recorded_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/distancematrix/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "rows": [{"elements": [{"status": "ZERO_RESULTS"}]}]
            })))
            .mount(&server)
            .await;

        let client = DistanceClient::new_with_base_url(&server.uri(), "test-key").unwrap();
        let events = vec![event("Atlantis", "2025-10-09T10:00:00Z")];
        let summary = summarize(&events, Some("Oakland, CA"), Some(&client)).await;

        assert_eq!(summary["Atlantis"].status.as_deref(), Some("ZERO_RESULTS"));
        assert_eq!(summary["Atlantis"].event_count, 1);
    }
}
