//! HTTP client for a Google-Directions-style JSON web service.
//!
//! Encodes a [`DirectionsRequest`] as query parameters and surfaces any
//! status other than `OK` as [`DirectionsError::Upstream`]. Requests that
//! never reached the service may be resent, see [`DirectionsClient::with_retry`].

use std::time::Duration;

use campusnav_core::DirectionsRequest;
use reqwest::{Client, Url};

use crate::error::DirectionsError;
use crate::retry::RetryPolicy;
use crate::types::{DirectionsResponse, Route};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/";

/// Most intermediate points the service accepts in one request.
pub const MAX_SERVICE_WAYPOINTS: usize = 25;

/// Client for the directions service.
///
/// Use [`DirectionsClient::new`] for the public endpoint or
/// [`DirectionsClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct DirectionsClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
    retry: RetryPolicy,
}

impl std::fmt::Debug for DirectionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionsClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("max_retries", &self.retry.max_retries())
            .finish_non_exhaustive()
    }
}

impl DirectionsClient {
    /// Creates a client pointed at the public directions endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`DirectionsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: Option<&str>, timeout_secs: u64) -> Result<Self, DirectionsError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`DirectionsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DirectionsError::InvalidRequest`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, DirectionsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("campusnav/0.1 (campus-navigator)")
            .build()?;

        // A trailing slash keeps `join("json")` appending to the base path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            DirectionsError::InvalidRequest(format!("invalid base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            api_key: api_key.map(ToOwned::to_owned),
            base_url,
            retry: RetryPolicy::default(),
        })
    }

    /// Resends a request up to `max_retries` times when it fails before any
    /// response arrives (timeout or connection failure). Service statuses
    /// and HTTP error statuses are never resent.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.retry = RetryPolicy::new(max_retries, backoff_base_ms);
        self
    }

    /// Requests walking directions and returns the routes offered, best first.
    ///
    /// # Errors
    ///
    /// - [`DirectionsError::InvalidRequest`] if the request has more waypoints
    ///   than the service accepts.
    /// - [`DirectionsError::Upstream`] if the service status is not `OK`.
    /// - [`DirectionsError::Http`] on network failure or non-2xx HTTP status.
    /// - [`DirectionsError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn route(&self, request: &DirectionsRequest) -> Result<Vec<Route>, DirectionsError> {
        if request.waypoints.len() > MAX_SERVICE_WAYPOINTS {
            return Err(DirectionsError::InvalidRequest(format!(
                "{} waypoints exceeds the service limit of {MAX_SERVICE_WAYPOINTS}",
                request.waypoints.len()
            )));
        }

        let url = self.build_url(request)?;
        let routes = self.retry.run(|| self.fetch_routes(&url)).await?;

        tracing::debug!(
            routes = routes.len(),
            waypoints = request.waypoints.len(),
            "directions received"
        );
        Ok(routes)
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, request: &DirectionsRequest) -> Result<Url, DirectionsError> {
        let mut url = self
            .base_url
            .join("json")
            .map_err(|e| DirectionsError::InvalidRequest(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("origin", &request.origin.to_query_value());
            pairs.append_pair("destination", &request.destination.to_query_value());
            if !request.waypoints.is_empty() {
                let waypoints = request
                    .waypoints
                    .iter()
                    .map(|w| {
                        let point = w.location.to_query_value();
                        if w.stopover {
                            point
                        } else {
                            format!("via:{point}")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("|");
                pairs.append_pair("waypoints", &waypoints);
            }
            pairs.append_pair(
                "alternatives",
                if request.provide_route_alternatives {
                    "true"
                } else {
                    "false"
                },
            );
            pairs.append_pair("mode", request.travel_mode.as_str());
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        Ok(url)
    }

    async fn fetch_routes(&self, url: &Url) -> Result<Vec<Route>, DirectionsError> {
        let body = self.request_json(url).await?;
        let response: DirectionsResponse =
            serde_json::from_value(body).map_err(|e| DirectionsError::Deserialize {
                context: "directions response".to_string(),
                source: e,
            })?;
        Self::check_status(response)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the response
    /// body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, DirectionsError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DirectionsError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }

    fn check_status(response: DirectionsResponse) -> Result<Vec<Route>, DirectionsError> {
        if response.status == "OK" {
            return Ok(response.routes);
        }
        tracing::info!(status = %response.status, "directions service returned non-OK status");
        Err(DirectionsError::Upstream {
            status: response.status,
            message: response.error_message,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
