use axum::{extract::State, Extension, Json};
use campusnav_core::{markers, plan_route, MarkerSpec, NavError, RouteForm, WaypointSlots};
use campusnav_directions::{DirectionsError, Route};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsBody {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub waypoints: Vec<String>,
    /// Which of the offered routes to render; the first when omitted.
    pub route_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct RouteSummary {
    summary: String,
    distance_meters: u64,
    duration_seconds: u64,
}

#[derive(Debug, Serialize)]
pub(super) struct MarkerItem {
    #[serde(flatten)]
    marker: MarkerSpec,
    info_html: String,
}

#[derive(Debug, Serialize)]
pub(super) struct DirectionsData {
    stops: Vec<String>,
    /// Waypoint names after reconciliation, blanks removed.
    waypoints: Vec<String>,
    route_index: usize,
    routes: Vec<RouteSummary>,
    route: Route,
    markers: Vec<MarkerItem>,
}

pub(super) async fn get_directions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DirectionsBody>,
) -> Result<Json<ApiResponse<DirectionsData>>, ApiError> {
    let directory = state.location_directory(&req_id.0)?;
    let map = state.map_config(&req_id.0)?;

    let waypoints = WaypointSlots::from_values(body.waypoints)
        .map_err(|e| map_nav_error(req_id.0.clone(), &e))?;
    let form = RouteForm {
        start: body.start,
        end: body.end,
        waypoints,
    };
    let plan = plan_route(&form, &directory).map_err(|e| map_nav_error(req_id.0.clone(), &e))?;

    let request = plan.directions_request(map.allow_multiple_routes);
    let mut routes = state
        .directions
        .route(&request)
        .await
        .map_err(|e| map_directions_error(req_id.0.clone(), &e))?;

    let route_index = body.route_index.unwrap_or(0);
    if route_index >= routes.len() {
        return Err(if routes.is_empty() {
            ApiError::new(
                req_id.0,
                "directions_failed",
                "Error getting directions, server returned no routes",
            )
        } else {
            ApiError::new(
                req_id.0,
                "bad_request",
                format!(
                    "route_index {route_index} is out of range; {} routes available",
                    routes.len()
                ),
            )
        });
    }

    let summaries = routes
        .iter()
        .map(|route| RouteSummary {
            summary: route.summary.clone(),
            distance_meters: route.total_distance_meters(),
            duration_seconds: route.total_duration_seconds(),
        })
        .collect();
    let route = routes.swap_remove(route_index);

    let stops = plan.stops();
    let markers = markers(&stops, &route.leg_endpoints())
        .into_iter()
        .map(|marker| MarkerItem {
            info_html: marker.info.to_html(),
            marker,
        })
        .collect();

    tracing::info!(stops = stops.len(), route_index, "directions served");

    Ok(Json(ApiResponse {
        data: DirectionsData {
            stops: stops.iter().map(|record| record.name().to_string()).collect(),
            waypoints: plan
                .waypoints
                .iter()
                .map(|record| record.name().to_string())
                .collect(),
            route_index,
            routes: summaries,
            route,
            markers,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_nav_error(request_id: String, error: &NavError) -> ApiError {
    let code = match error {
        NavError::MissingRequiredField | NavError::WaypointLimit { .. } => "validation_error",
        NavError::UnresolvedLocations(_) => "unresolved_locations",
    };
    ApiError::new(request_id, code, error.to_string())
}

fn map_directions_error(request_id: String, error: &DirectionsError) -> ApiError {
    match error {
        DirectionsError::Upstream { .. } => {
            ApiError::new(request_id, "directions_failed", error.to_string())
        }
        DirectionsError::InvalidRequest(_) => {
            ApiError::new(request_id, "bad_request", error.to_string())
        }
        DirectionsError::Http(e) => {
            tracing::error!(error = %error, "directions service request failed");
            let message = match e.status() {
                Some(status) => format!("Error getting directions, server returned: {status}"),
                None => "directions service unreachable".to_string(),
            };
            ApiError::new(request_id, "upstream_error", message)
        }
        DirectionsError::Deserialize { .. } => {
            tracing::error!(error = %error, "directions service response unreadable");
            ApiError::new(
                request_id,
                "upstream_error",
                "directions service returned an unreadable response",
            )
        }
    }
}
