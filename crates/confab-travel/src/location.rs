//! Origin detection from the caller's IP.
//! Uses ipinfo.io - free, no API key required.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const IPINFO_URL: &str = "https://ipinfo.io/json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    loc: Option<String>,
}

/// Detect a coarse origin location ("City, Region, Country") from the
/// caller's IP. Returns `None` on any failure; the caller decides whether to
/// skip enrichment or use an explicit origin instead.
pub async fn detect_origin() -> Option<String> {
    let client = match Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(error) => {
            tracing::warn!("Failed to create location client: {}", error);
            return None;
        }
    };

    fetch_origin(&client, IPINFO_URL).await
}

async fn fetch_origin(client: &Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(error) => {
            tracing::debug!("Location request failed: {}", error);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("Location service returned status {}", response.status());
        return None;
    }

    let body: IpInfoResponse = match response.json().await {
        Ok(body) => body,
        Err(error) => {
            tracing::debug!("Location parse error: {}", error);
            return None;
        }
    };

    if let Some(loc) = &body.loc {
        tracing::debug!("Detected coordinates: {}", loc);
    }

    let origin = [body.city, body.region, body.country]
        .into_iter()
        .flatten()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if origin.is_empty() {
        tracing::debug!("Location service returned no usable fields");
        return None;
    }

    tracing::info!("Detected origin: {}", origin);
    Some(origin)
}
