//! Wire types for the directions service JSON response.
//!
//! Only the fields the navigator renders are modelled; everything else in
//! the payload is ignored.

use campusnav_core::{Coordinate, LegEndpoints};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinate {
    fn from(value: LatLng) -> Self {
        Coordinate::new(value.lat, value.lng)
    }
}

/// A human-readable measure plus its raw value (meters or seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub html_instructions: String,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    pub start_location: LatLng,
    pub end_location: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub start_location: LatLng,
    pub end_location: LatLng,
    #[serde(default)]
    pub start_address: Option<String>,
    #[serde(default)]
    pub end_address: Option<String>,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub copyrights: Option<String>,
}

impl Route {
    /// Start and end of each leg, in travel order.
    #[must_use]
    pub fn leg_endpoints(&self) -> Vec<LegEndpoints> {
        self.legs
            .iter()
            .map(|leg| LegEndpoints {
                start: leg.start_location.into(),
                end: leg.end_location.into(),
            })
            .collect()
    }

    /// Total walking distance in meters, summed over legs that report one.
    #[must_use]
    pub fn total_distance_meters(&self) -> u64 {
        self.legs
            .iter()
            .filter_map(|leg| leg.distance.as_ref())
            .map(|d| d.value)
            .sum()
    }

    /// Total walking time in seconds, summed over legs that report one.
    #[must_use]
    pub fn total_duration_seconds(&self) -> u64 {
        self.legs
            .iter()
            .filter_map(|leg| leg.duration.as_ref())
            .map(|d| d.value)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(start: (f64, f64), end: (f64, f64), meters: u64, seconds: u64) -> serde_json::Value {
        serde_json::json!({
            "start_location": { "lat": start.0, "lng": start.1 },
            "end_location": { "lat": end.0, "lng": end.1 },
            "distance": { "text": format!("{meters} m"), "value": meters },
            "duration": { "text": format!("{seconds} s"), "value": seconds },
            "steps": []
        })
    }

    #[test]
    fn route_deserializes_with_missing_optional_fields() {
        let route: Route = serde_json::from_value(serde_json::json!({
            "legs": [{
                "start_location": { "lat": 1.0, "lng": 2.0 },
                "end_location": { "lat": 3.0, "lng": 4.0 }
            }]
        }))
        .unwrap();
        assert_eq!(route.summary, "");
        assert!(route.warnings.is_empty());
        assert_eq!(route.legs[0].distance, None);
        assert_eq!(route.total_distance_meters(), 0);
    }

    #[test]
    fn leg_endpoints_follow_leg_order() {
        let route: Route = serde_json::from_value(serde_json::json!({
            "summary": "College Walk",
            "legs": [leg((1.0, 1.0), (2.0, 2.0), 100, 80), leg((2.0, 2.0), (3.0, 3.0), 250, 200)]
        }))
        .unwrap();

        let endpoints = route.leg_endpoints();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].start, Coordinate::new(1.0, 1.0));
        assert_eq!(endpoints[1].end, Coordinate::new(3.0, 3.0));
        assert_eq!(route.total_distance_meters(), 350);
        assert_eq!(route.total_duration_seconds(), 280);
    }
}
