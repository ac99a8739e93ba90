use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::ApiError;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug)]
struct QuotaWindow {
    opened_at: Instant,
    used: u32,
}

/// Caps how many directions lookups the server forwards to the external
/// service per window. Location and map reads are served from memory and
/// are not counted.
#[derive(Debug, Clone)]
pub struct DirectionsQuota {
    limit: u32,
    window: Duration,
    state: Arc<Mutex<QuotaWindow>>,
}

impl DirectionsQuota {
    #[must_use]
    pub fn per_minute(limit: u32) -> Self {
        Self::with_window(limit, Duration::from_secs(60))
    }

    #[must_use]
    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Arc::new(Mutex::new(QuotaWindow {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    /// Takes one lookup from the current window, or returns the time left
    /// until the window reopens.
    async fn acquire(&self) -> Result<(), Duration> {
        let mut window = self.state.lock().await;
        let elapsed = window.opened_at.elapsed();
        if elapsed >= self.window {
            window.opened_at = Instant::now();
            window.used = 0;
        } else if window.used >= self.limit {
            return Err(self.window - elapsed);
        }
        window.used += 1;
        Ok(())
    }
}

/// Uses the caller's `x-request-id` or generates a `UUIDv4`, exposes it to
/// handlers as [`RequestId`], tags the request's log lines with it, and
/// echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));
    let span = tracing::info_span!("request", request_id = %id);

    let mut res = next.run(req).instrument(span).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }
    res
}

/// Rejects a directions lookup with `429 rate_limited` once the quota for
/// the current window is spent.
pub async fn limit_directions(
    State(quota): State<DirectionsQuota>,
    Extension(req_id): Extension<RequestId>,
    req: Request,
    next: Next,
) -> Response {
    match quota.acquire().await {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let wait_secs = wait.as_secs().max(1);
            tracing::warn!(limit = quota.limit, wait_secs, "directions quota exhausted");
            let mut res = ApiError::new(
                req_id.0,
                "rate_limited",
                format!("too many directions requests; try again in {wait_secs} s"),
            )
            .into_response();
            res.headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(wait_secs));
            res
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::StatusCode,
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt;

    use super::*;

    fn router(quota: DirectionsQuota) -> Router {
        Router::new()
            .route("/locations", get(|| async { "names" }))
            .route(
                "/directions",
                post(|| async { "route" })
                    .layer(axum::middleware::from_fn_with_state(quota, limit_directions)),
            )
            .layer(axum::middleware::from_fn(request_id))
    }

    fn request(method: &str, uri: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn request_id_is_echoed_when_supplied() {
        let response = router(DirectionsQuota::per_minute(10))
            .oneshot(
                Request::builder()
                    .uri("/locations")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response.headers().get("x-request-id").unwrap(),
            &HeaderValue::from_static("req-42")
        );
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let response = router(DirectionsQuota::per_minute(10))
            .oneshot(request("GET", "/locations"))
            .await
            .expect("response");
        let id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("generated id");
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn lookups_over_the_quota_are_rejected_with_retry_after() {
        let app = router(DirectionsQuota::per_minute(2));
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(request("POST", "/directions"))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(request("POST", "/directions"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .expect("retry-after header");
        assert!((1..=60).contains(&retry_after));
    }

    #[tokio::test]
    async fn location_reads_do_not_spend_quota() {
        let app = router(DirectionsQuota::per_minute(1));
        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(request("GET", "/locations"))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = app
            .oneshot(request("POST", "/directions"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn quota_reopens_after_the_window() {
        let quota = DirectionsQuota::with_window(1, Duration::ZERO);
        assert!(quota.acquire().await.is_ok());
        assert!(quota.acquire().await.is_ok());

        let quota = DirectionsQuota::with_window(1, Duration::from_secs(60));
        assert!(quota.acquire().await.is_ok());
        assert!(quota.acquire().await.is_err());
    }
}
