//! Paginated client for the upstream calendar API.

use std::time::Duration;

use tracing::instrument;

use confab_core::config::{GeoBounds, SourceRef};

use crate::error::SourceError;
use crate::retry::{with_retry, RetryConfig};
use crate::types::{CalendarItemEntry, DiscoverEntry, Page, RawEntry};

const API_BASE: &str = "https://api2.luma.com";
const DISCOVER_PATH: &str = "/discover/get-paginated-events";
const CALENDAR_ITEMS_PATH: &str = "/calendar/get-items";

const PAGINATION_LIMIT: u32 = 100;
const REQUEST_TIMEOUT_SECS: u64 = 10;
/// Pause between page requests of one source, to be polite to the API.
const PAGE_DELAY: Duration = Duration::from_millis(200);

/// Client for both upstream endpoint shapes.
///
/// Cloning is cheap; the aggregator hands one clone to each per-source task.
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: reqwest::Client,
    base_url: String,
    bounds: GeoBounds,
    retry: RetryConfig,
}

impl SourceClient {
    pub fn new(bounds: GeoBounds) -> Result<Self, SourceError> {
        Self::new_with_base_url(API_BASE, bounds, RetryConfig::default())
    }

    /// Build a client against an alternate base URL (used by tests).
    pub fn new_with_base_url(
        base_url: &str,
        bounds: GeoBounds,
        retry: RetryConfig,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bounds,
            retry,
        })
    }

    /// Fetch every page of one source and return its raw entries.
    ///
    /// Pages are requested until the upstream reports no continuation
    /// (`has_more` false, cursor absent, or an empty page). Transient
    /// failures are retried per request; exhaustion fails the whole source.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_source(&self, source: &SourceRef) -> Result<Vec<RawEntry>, SourceError> {
        match source {
            SourceRef::Slug { slug } => self.fetch_discover(slug).await,
            SourceRef::Calendar {
                calendar_api_id, ..
            } => self.fetch_calendar_items(calendar_api_id).await,
        }
    }

    async fn fetch_discover(&self, slug: &str) -> Result<Vec<RawEntry>, SourceError> {
        let url = format!("{}{}", self.base_url, DISCOVER_PATH);
        let mut collected = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = self.base_params();
            params.push(("slug".to_string(), slug.to_string()));
            if let Some(cursor) = &cursor {
                params.push(("pagination_cursor".to_string(), cursor.clone()));
            }

            let page: Page<DiscoverEntry> = self.get_page(&url, &params).await?;
            let Page {
                entries,
                has_more,
                next_cursor,
            } = page;

            let fetched = entries.len();
            collected.extend(entries.into_iter().map(RawEntry::Discover));
            tracing::debug!(slug, fetched, total = collected.len(), has_more, "Fetched page");

            cursor = next_cursor;
            if !has_more || cursor.is_none() || fetched == 0 {
                break;
            }
            tokio::time::sleep(PAGE_DELAY).await;
        }

        Ok(collected)
    }

    async fn fetch_calendar_items(&self, calendar_api_id: &str) -> Result<Vec<RawEntry>, SourceError> {
        let url = format!("{}{}", self.base_url, CALENDAR_ITEMS_PATH);
        let mut collected = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = self.base_params();
            params.push(("calendar_api_id".to_string(), calendar_api_id.to_string()));
            params.push(("location_required".to_string(), "true".to_string()));
            params.push(("period".to_string(), "future".to_string()));
            if let Some(cursor) = &cursor {
                params.push(("pagination_cursor".to_string(), cursor.clone()));
            }

            let page: Page<CalendarItemEntry> = self.get_page(&url, &params).await?;
            let Page {
                entries,
                has_more,
                next_cursor,
            } = page;

            let fetched = entries.len();
            collected.extend(entries.into_iter().map(RawEntry::CalendarItem));
            tracing::debug!(
                calendar_api_id,
                fetched,
                total = collected.len(),
                has_more,
                "Fetched page"
            );

            cursor = next_cursor;
            if !has_more || cursor.is_none() || fetched == 0 {
                break;
            }
            tokio::time::sleep(PAGE_DELAY).await;
        }

        Ok(collected)
    }

    fn base_params(&self) -> Vec<(String, String)> {
        vec![
            ("east".to_string(), self.bounds.east.to_string()),
            ("north".to_string(), self.bounds.north.to_string()),
            ("south".to_string(), self.bounds.south.to_string()),
            ("west".to_string(), self.bounds.west.to_string()),
            ("pagination_limit".to_string(), PAGINATION_LIMIT.to_string()),
        ]
    }

    async fn get_page<E>(&self, url: &str, params: &[(String, String)]) -> Result<Page<E>, SourceError>
    where
        E: serde::de::DeserializeOwned + std::default::Default,
    {
        let response = with_retry(&self.retry, || {
            self.client.get(url).query(params).send()
        })
        .await
        .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!(
                "{url} returned {status}"
            )));
        }

        response
            .json::<Page<E>>()
            .await
            .map_err(|e| SourceError::Api(format!("Invalid page payload: {e}")))
    }
}
