use axum::{
    extract::{Query, State},
    Extension, Json,
};
use campusnav_core::{filter_candidates, SuggestionItem};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct LocationsData {
    names: Vec<String>,
    suggestions: Vec<SuggestionItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct SuggestionsData {
    query: String,
    candidates: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
}

pub(super) async fn list_locations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<LocationsData>>, ApiError> {
    let directory = state.location_directory(&req_id.0)?;

    Ok(Json(ApiResponse {
        data: LocationsData {
            names: directory.all_names(),
            suggestions: directory.suggestion_items(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_suggestions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<ApiResponse<SuggestionsData>>, ApiError> {
    let directory = state.location_directory(&req_id.0)?;
    let candidates = filter_candidates(&query.q, &directory.all_names());

    Ok(Json(ApiResponse {
        data: SuggestionsData {
            query: query.q,
            candidates,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
