//! Route submission: validation of the form against the directory and
//! shaping of the request handed to the directions service.

use serde::Serialize;

use crate::directory::LocationDirectory;
use crate::error::NavError;
use crate::form::RouteForm;
use crate::location::{Coordinate, LocationRecord};
use crate::reconcile::reconcile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
}

impl TravelMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
        }
    }
}

/// An intermediate point of a directions request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RequestWaypoint {
    pub location: Coordinate,
    /// The route must physically pass through the point rather than merely
    /// be shaped by it.
    pub stopover: bool,
}

/// Everything the directions service needs to compute a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub waypoints: Vec<RequestWaypoint>,
    pub provide_route_alternatives: bool,
    pub travel_mode: TravelMode,
}

/// A validated route: every stop resolved to a directory record.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan<'a> {
    pub start: &'a LocationRecord,
    pub waypoints: Vec<&'a LocationRecord>,
    pub end: &'a LocationRecord,
}

impl<'a> RoutePlan<'a> {
    /// Stops in travel order: start, each waypoint, end.
    #[must_use]
    pub fn stops(&self) -> Vec<&'a LocationRecord> {
        let mut stops = Vec::with_capacity(self.waypoints.len() + 2);
        stops.push(self.start);
        stops.extend(self.waypoints.iter().copied());
        stops.push(self.end);
        stops
    }

    /// Builds a walking-directions request. Waypoints are always stopovers.
    #[must_use]
    pub fn directions_request(&self, provide_route_alternatives: bool) -> DirectionsRequest {
        DirectionsRequest {
            origin: self.start.coordinate(),
            destination: self.end.coordinate(),
            waypoints: self
                .waypoints
                .iter()
                .map(|record| RequestWaypoint {
                    location: record.coordinate(),
                    stopover: true,
                })
                .collect(),
            provide_route_alternatives,
            travel_mode: TravelMode::Walking,
        }
    }
}

/// Validates a submitted form.
///
/// Start and end must both be non-blank before any lookup happens. Unknown
/// names are collected in form order (start, waypoints, end) and reported
/// together.
///
/// # Errors
///
/// Returns [`NavError::MissingRequiredField`] for a blank start or end, and
/// [`NavError::UnresolvedLocations`] when any name fails lookup.
pub fn plan_route<'a>(
    form: &RouteForm,
    directory: &'a LocationDirectory,
) -> Result<RoutePlan<'a>, NavError> {
    if form.start.trim().is_empty() || form.end.trim().is_empty() {
        return Err(NavError::MissingRequiredField);
    }

    let start = directory.lookup(&form.start);
    let waypoints = reconcile(form.waypoints.values(), directory);
    let end = directory.lookup(&form.end);

    let mut invalid = Vec::new();
    if start.is_none() {
        invalid.push(form.start.clone());
    }
    invalid.extend(waypoints.invalid.iter().cloned());
    if end.is_none() {
        invalid.push(form.end.clone());
    }

    match (start, end) {
        (Some(start), Some(end)) if invalid.is_empty() => Ok(RoutePlan {
            start,
            waypoints: waypoints.resolved,
            end,
        }),
        _ => {
            tracing::debug!(invalid = ?invalid, "route submission rejected");
            Err(NavError::UnresolvedLocations(invalid))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::WaypointSlots;
    use crate::test_support::campus_directory;

    fn form(start: &str, waypoints: &[&str], end: &str) -> RouteForm {
        RouteForm {
            start: start.to_string(),
            end: end.to_string(),
            waypoints: WaypointSlots::from_values(waypoints.iter().copied()).unwrap(),
        }
    }

    #[test]
    fn blank_endpoint_is_missing_required_field() {
        let directory = campus_directory();
        let err = plan_route(&form("Gym", &[], "  "), &directory).unwrap_err();
        assert_eq!(err, NavError::MissingRequiredField);
        let err = plan_route(&form("", &["Nowhere"], "Gym"), &directory).unwrap_err();
        assert_eq!(err, NavError::MissingRequiredField);
    }

    #[test]
    fn unresolved_names_are_reported_in_form_order() {
        let directory = campus_directory();
        let err = plan_route(&form("Moon", &["Lab", "Mars"], "Sun"), &directory).unwrap_err();
        assert_eq!(
            err,
            NavError::UnresolvedLocations(vec![
                "Moon".to_string(),
                "Mars".to_string(),
                "Sun".to_string()
            ])
        );
        assert!(err.to_string().ends_with("Moon\nMars\nSun"));
    }

    #[test]
    fn valid_form_yields_ordered_stops() {
        let directory = campus_directory();
        let plan = plan_route(&form("gym", &["", "Library", " "], "LAB"), &directory).unwrap();
        let names: Vec<&str> = plan
            .stops()
            .into_iter()
            .map(LocationRecord::name)
            .collect();
        assert_eq!(names, vec!["Gym", "Library", "Lab"]);
        assert_eq!(plan.waypoints.len(), 1);
    }

    #[test]
    fn directions_request_marks_waypoints_as_stopovers() {
        let directory = campus_directory();
        let plan = plan_route(&form("Gym", &["Library"], "Lab"), &directory).unwrap();
        let request = plan.directions_request(true);

        assert_eq!(request.origin, directory.lookup("gym").unwrap().coordinate());
        assert_eq!(request.destination, directory.lookup("lab").unwrap().coordinate());
        assert_eq!(request.waypoints.len(), 1);
        assert!(request.waypoints[0].stopover);
        assert!(request.provide_route_alternatives);
        assert_eq!(request.travel_mode, TravelMode::Walking);
    }

    #[test]
    fn request_without_waypoints_has_empty_list() {
        let directory = campus_directory();
        let plan = plan_route(&form("Gym", &[], "Lab"), &directory).unwrap();
        let request = plan.directions_request(false);
        assert!(request.waypoints.is_empty());
        assert!(!request.provide_route_alternatives);
    }
}
