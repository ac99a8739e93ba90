//! Campus navigation core: location directory, configuration parsing,
//! waypoint reconciliation, route planning and the autosuggest controller.
//!
//! Everything here works on plain values. Adapters (HTTP API, CLI) translate
//! user events into calls on these types and render the results.

pub mod app_config;
pub mod config;
pub mod directory;
pub mod documents;
pub mod error;
pub mod form;
pub mod location;
pub mod reconcile;
pub mod render;
pub mod route;
pub mod session;
pub mod suggest;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use directory::{LocationDirectory, RawCoordinates, RawLocation, SuggestionItem};
pub use documents::{
    clamp_zoom, load_locations, load_map_config, parse_configuration_xml, parse_locations_xml,
    MapConfig, MapType,
};
pub use error::{ConfigError, FieldError, NavError};
pub use form::{RouteForm, WaypointSlots, WAYPOINT_MAX};
pub use location::{Coordinate, LocationRecord};
pub use reconcile::{reconcile, Reconciliation};
pub use render::{markers, InfoWindow, LegEndpoints, MarkerSpec};
pub use route::{plan_route, DirectionsRequest, RequestWaypoint, RoutePlan, TravelMode};
pub use session::{Completion, Endpoint, NavigatorSession, Submission};
pub use suggest::{
    filter_candidates, popup_placement, FieldKey, OffsetBox, PopupPlacement, SuggestController,
    SuggestState,
};
