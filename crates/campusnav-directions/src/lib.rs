//! Client for the external walking-directions service.

pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::{DirectionsClient, MAX_SERVICE_WAYPOINTS};
pub use error::DirectionsError;
pub use types::{DirectionsResponse, LatLng, Leg, Route, Step, TextValue};
