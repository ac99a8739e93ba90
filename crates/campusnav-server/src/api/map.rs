use axum::{
    extract::{Query, State},
    Extension, Json,
};
use campusnav_core::{clamp_zoom, MapConfig};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct MapQuery {
    /// Highest zoom level the client's imagery supports at the map center.
    pub max_zoom: Option<u8>,
}

pub(super) async fn get_map(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MapQuery>,
) -> Result<Json<ApiResponse<MapConfig>>, ApiError> {
    let mut map = state.map_config(&req_id.0)?.as_ref().clone();
    if let Some(max_zoom) = query.max_zoom {
        map.zoom = clamp_zoom(map.zoom, max_zoom);
    }

    Ok(Json(ApiResponse {
        data: map,
        meta: ResponseMeta::new(req_id.0),
    }))
}
