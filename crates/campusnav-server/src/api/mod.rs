mod directions;
mod locations;
mod map;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use campusnav_core::{LocationDirectory, MapConfig};
use campusnav_directions::DirectionsClient;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{limit_directions, request_id, DirectionsQuota, RequestId};

/// Shared state for every handler.
///
/// The map configuration and the location list are loaded independently at
/// startup; either may be absent, in which case only the endpoints that need
/// it answer `feature_unavailable`.
#[derive(Clone)]
pub struct AppState {
    pub map: Option<Arc<MapConfig>>,
    pub directory: Option<Arc<LocationDirectory>>,
    pub directions: Arc<DirectionsClient>,
}

impl AppState {
    pub(super) fn map_config(&self, request_id: &str) -> Result<Arc<MapConfig>, ApiError> {
        self.map.clone().ok_or_else(|| {
            ApiError::new(
                request_id,
                "feature_unavailable",
                "map configuration could not be loaded",
            )
        })
    }

    pub(super) fn location_directory(
        &self,
        request_id: &str,
    ) -> Result<Arc<LocationDirectory>, ApiError> {
        self.directory.clone().ok_or_else(|| {
            ApiError::new(
                request_id,
                "feature_unavailable",
                "location list could not be loaded",
            )
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    map_config: &'static str,
    locations: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "unresolved_locations" | "directions_failed" => StatusCode::UNPROCESSABLE_ENTITY,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            "feature_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn api_router(quota: DirectionsQuota) -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/map", get(map::get_map))
        .route("/api/v1/locations", get(locations::list_locations))
        .route(
            "/api/v1/locations/suggestions",
            get(locations::list_suggestions),
        )
        .route(
            "/api/v1/directions",
            post(directions::get_directions).layer(axum::middleware::from_fn_with_state(
                quota,
                limit_directions,
            )),
        )
}

pub fn build_app(state: AppState, quota: DirectionsQuota) -> Router {
    Router::new()
        .merge(api_router(quota))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let readiness = |ready: bool| if ready { "ok" } else { "unavailable" };
    let map_ready = state.map.is_some();
    let locations_ready = state.directory.is_some();

    let (status, overall) = if map_ready && locations_ready {
        (StatusCode::OK, "ok")
    } else {
        tracing::warn!(map_ready, locations_ready, "health check: degraded");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(ApiResponse {
            data: HealthData {
                status: overall,
                map_config: readiness(map_ready),
                locations: readiness(locations_ready),
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}
