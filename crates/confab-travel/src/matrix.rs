//! Distance-matrix provider client.

use std::time::Duration;

use serde::Deserialize;
use tracing::instrument;

use confab_core::STATUS_OK;

use crate::types::TravelError;

const MATRIX_API_BASE: &str = "https://maps.googleapis.com";
const MATRIX_PATH: &str = "/maps/api/distancematrix/json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// One origin→destination leg as reported by the provider.
///
/// `status` mirrors the provider's element status; metrics are present only
/// when it is `OK`.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub status: String,
    pub distance_text: Option<String>,
    pub distance_meters: Option<u64>,
    pub duration_text: Option<String>,
    pub duration_seconds: Option<u64>,
}

impl Leg {
    /// True when the provider resolved the leg and all metrics are present.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: Option<String>,
    distance: Option<MatrixValue>,
    duration: Option<MatrixValue>,
}

#[derive(Debug, Deserialize)]
struct MatrixValue {
    text: Option<String>,
    value: Option<u64>,
}

/// Client for the distance-matrix API.
#[derive(Debug, Clone)]
pub struct DistanceClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl DistanceClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, TravelError> {
        Self::new_with_base_url(MATRIX_API_BASE, api_key)
    }

    /// Build a client reading the API key from [`API_KEY_ENV`].
    pub fn from_env() -> Result<Self, TravelError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::new(key),
            _ => Err(TravelError::MissingApiKey(API_KEY_ENV)),
        }
    }

    /// Build a client against an alternate base URL (used by tests).
    pub fn new_with_base_url(base_url: &str, api_key: impl Into<String>) -> Result<Self, TravelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Driving distance and duration from `origin` to `destination`.
    ///
    /// One attempt, no retry: a failed lookup only costs one city its
    /// enrichment. Non-`OK` element statuses come back as a [`Leg`] so the
    /// caller can pass them through; transport and payload problems are
    /// errors.
    #[instrument(skip(self), level = "debug")]
    pub async fn distance_matrix(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Leg, TravelError> {
        let url = format!(
            "{}{}?origins={}&destinations={}&mode=driving&key={}",
            self.base_url,
            MATRIX_PATH,
            urlencoding::encode(origin),
            urlencoding::encode(destination),
            urlencoding::encode(&self.api_key),
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TravelError::Api(format!(
                "distance matrix returned {status}"
            )));
        }

        let body: MatrixResponse = response
            .json()
            .await
            .map_err(|e| TravelError::Api(format!("invalid matrix payload: {e}")))?;

        if body.status.as_deref() != Some(STATUS_OK) {
            return Err(TravelError::Api(format!(
                "matrix status {}",
                body.status.unwrap_or_else(|| "missing".to_string())
            )));
        }

        let element = body
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| TravelError::Api("matrix response had no elements".to_string()))?;

        let element_status = element
            .status
            .unwrap_or_else(|| "UNKNOWN".to_string());

        if element_status != STATUS_OK {
            return Ok(Leg {
                status: element_status,
                distance_text: None,
                distance_meters: None,
                duration_text: None,
                duration_seconds: None,
            });
        }

        Ok(Leg {
            status: element_status,
            distance_text: element.distance.as_ref().and_then(|d| d.text.clone()),
            distance_meters: element.distance.as_ref().and_then(|d| d.value),
            duration_text: element.duration.as_ref().and_then(|d| d.text.clone()),
            duration_seconds: element.duration.as_ref().and_then(|d| d.value),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ok_matrix_body() -> serde_json::Value {
        serde_json::json!({
            "status": "OK",
            "rows": [{
                "elements": [{
                    "status": "OK",
                    "distance": {"text": "15.2 mi", "value": 24461},
                    "duration": {"text": "23 mins", "value": 1380}
                }]
            }]
        })
    }

    #[tokio::test]
    async fn parses_a_successful_leg() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(MATRIX_PATH))
            .and(query_param("origins", "San Francisco, California, US"))
            .and(query_param("destinations", "Mountain View, California"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_matrix_body()))
            .mount(&server)
            .await;

        let client = DistanceClient::new_with_base_url(&server.uri(), "test-key").unwrap();
        let leg = client
            .distance_matrix("San Francisco, California, US", "Mountain View, California")
            .await
            .unwrap();

        assert!(leg.is_ok());
        assert_eq!(leg.distance_meters, Some(24461));
        assert_eq!(leg.duration_seconds, Some(1380));
        assert_eq!(leg.distance_text.as_deref(), Some("15.2 mi"));
    }

    #[tokio::test]
    async fn non_ok_element_status_is_passed_through() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(MATRIX_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "rows": [{"elements": [{"status": "NOT_FOUND"}]}]
            })))
            .mount(&server)
            .await;

        let client = DistanceClient::new_with_base_url(&server.uri(), "test-key").unwrap();
        let leg = client.distance_matrix("here", "nowhere").await.unwrap();

        assert!(!leg.is_ok());
        assert_eq!(leg.status, "NOT_FOUND");
        assert_eq!(leg.distance_meters, None);
    }

    #[tokio::test]
    async fn top_level_error_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(MATRIX_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "REQUEST_DENIED"
            })))
            .mount(&server)
            .await;

        let client = DistanceClient::new_with_base_url(&server.uri(), "bad-key").unwrap();
        let result = client.distance_matrix("here", "there").await;
        assert!(matches!(result, Err(TravelError::Api(_))));
    }

    #[tokio::test]
    async fn http_failure_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(MATRIX_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = DistanceClient::new_with_base_url(&server.uri(), "test-key").unwrap();
        let result = client.distance_matrix("here", "there").await;
        assert!(matches!(result, Err(TravelError::Api(_))));
    }

    #[tokio::test]
    async fn empty_rows_are_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(MATRIX_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "rows": []
            })))
            .mount(&server)
            .await;

        let client = DistanceClient::new_with_base_url(&server.uri(), "test-key").unwrap();
        let result = client.distance_matrix("here", "there").await;
        assert!(matches!(result, Err(TravelError::Api(_))));
    }
}
