//! Parsing of the two XML configuration documents.
//!
//! `configuration.xml` carries the initial map center and whether alternative
//! routes may be requested; `locations.xml` carries the campus locations. Both
//! are read with `quick-xml`'s serde support and validated here so that a
//! missing required element is reported by name.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::directory::{
    parse_degrees_in, LocationDirectory, RawCoordinates, RawLocation, LOCATIONS_DOCUMENT,
};
use crate::error::ConfigError;
use crate::location::Coordinate;

const CONFIGURATION_DOCUMENT: &str = "configuration.xml";

/// Zoom level the map opens at.
pub const DEFAULT_ZOOM: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Roadmap,
    Satellite,
    Hybrid,
    Terrain,
}

/// Map settings from `configuration.xml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapConfig {
    pub center: Coordinate,
    pub allow_multiple_routes: bool,
    pub zoom: u8,
    pub map_type: MapType,
}

impl MapConfig {
    #[must_use]
    pub fn new(center: Coordinate, allow_multiple_routes: bool) -> Self {
        Self {
            center,
            allow_multiple_routes,
            zoom: DEFAULT_ZOOM,
            map_type: MapType::Hybrid,
        }
    }
}

/// Zoom level to use once the maximum available zoom at the map center is
/// known: the current level, lowered to the maximum if it exceeds it.
#[must_use]
pub fn clamp_zoom(current: u8, max_at_center: u8) -> u8 {
    current.min(max_at_center)
}

#[derive(Debug, Deserialize)]
struct ConfigurationDocument {
    #[serde(default, rename = "allowMultipleRoutes")]
    allow_multiple_routes: Option<String>,
    #[serde(default)]
    center: Option<RawCoordinates>,
}

#[derive(Debug, Deserialize)]
struct LocationsDocument {
    #[serde(default, rename = "location")]
    locations: Vec<RawLocation>,
}

/// Parses `configuration.xml` content.
///
/// `allowMultipleRoutes` is true only when its text is `true` in any
/// capitalization.
///
/// # Errors
///
/// Returns [`ConfigError::XmlParse`] for malformed XML, and
/// [`ConfigError::MissingField`] / [`ConfigError::InvalidCoordinate`] when the
/// flag or the center coordinate is absent or not numeric.
pub fn parse_configuration_xml(xml: &str) -> Result<MapConfig, ConfigError> {
    let document: ConfigurationDocument =
        quick_xml::de::from_str(xml).map_err(|source| ConfigError::XmlParse {
            document: CONFIGURATION_DOCUMENT,
            source,
        })?;

    let flag = document
        .allow_multiple_routes
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingField {
            document: CONFIGURATION_DOCUMENT,
            entry: "configuration".to_string(),
            field: "allowMultipleRoutes",
        })?;
    let allow_multiple_routes = flag.eq_ignore_ascii_case("true");

    let center = document.center.ok_or_else(|| ConfigError::MissingField {
        document: CONFIGURATION_DOCUMENT,
        entry: "configuration".to_string(),
        field: "center",
    })?;
    let latitude = parse_degrees_in(
        CONFIGURATION_DOCUMENT,
        center.latitude.as_deref(),
        "center",
        "latitude",
    )?;
    let longitude = parse_degrees_in(
        CONFIGURATION_DOCUMENT,
        center.longitude.as_deref(),
        "center",
        "longitude",
    )?;

    Ok(MapConfig::new(
        Coordinate::new(latitude, longitude),
        allow_multiple_routes,
    ))
}

/// Parses `locations.xml` content into a [`LocationDirectory`].
///
/// # Errors
///
/// Returns [`ConfigError::XmlParse`] for malformed XML, or any error from
/// [`LocationDirectory::load`].
pub fn parse_locations_xml(xml: &str) -> Result<LocationDirectory, ConfigError> {
    let document: LocationsDocument =
        quick_xml::de::from_str(xml).map_err(|source| ConfigError::XmlParse {
            document: LOCATIONS_DOCUMENT,
            source,
        })?;
    LocationDirectory::load(document.locations)
}

/// Reads and parses `configuration.xml` from disk.
///
/// # Errors
///
/// Returns [`ConfigError::FileIo`] if the file cannot be read, or any error
/// from [`parse_configuration_xml`].
pub fn load_map_config(path: &Path) -> Result<MapConfig, ConfigError> {
    parse_configuration_xml(&read_document(path)?)
}

/// Reads and parses `locations.xml` from disk.
///
/// # Errors
///
/// Returns [`ConfigError::FileIo`] if the file cannot be read, or any error
/// from [`parse_locations_xml`].
pub fn load_locations(path: &Path) -> Result<LocationDirectory, ConfigError> {
    parse_locations_xml(&read_document(path)?)
}

fn read_document(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIGURATION: &str = r"<?xml version='1.0'?>
<configuration>
    <allowMultipleRoutes> True </allowMultipleRoutes>
    <center>
        <latitude>
            39.9522
        </latitude>
        <longitude>-75.1932</longitude>
    </center>
</configuration>";

    const LOCATIONS: &str = r"<?xml version='1.0'?>
<locations>
    <location>
        <name>  Library </name>
        <coordinates>
            <latitude>39.9525</latitude>
            <longitude>-75.1930</longitude>
        </coordinates>
        <street>3420 Walnut St</street>
        <cityStateZip>Philadelphia, PA 19104</cityStateZip>
        <description>Main research library</description>
    </location>
    <location>
        <name>Gym</name>
        <coordinates>
            <latitude>39.9500</latitude>
            <longitude>-75.1900</longitude>
        </coordinates>
    </location>
</locations>";

    #[test]
    fn parses_configuration_document() {
        let config = parse_configuration_xml(CONFIGURATION).unwrap();
        assert!(config.allow_multiple_routes);
        assert!((config.center.latitude() - 39.9522).abs() < 1e-9);
        assert!((config.center.longitude() + 75.1932).abs() < 1e-9);
        assert_eq!(config.zoom, DEFAULT_ZOOM);
        assert_eq!(config.map_type, MapType::Hybrid);
    }

    #[test]
    fn non_true_flag_disables_multiple_routes() {
        let xml = CONFIGURATION.replace(" True ", "yes");
        assert!(!parse_configuration_xml(&xml).unwrap().allow_multiple_routes);
    }

    #[test]
    fn missing_center_is_a_configuration_error() {
        let xml = "<configuration><allowMultipleRoutes>false</allowMultipleRoutes></configuration>";
        let err = parse_configuration_xml(xml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                document: "configuration.xml",
                field: "center",
                ..
            }
        ));
    }

    #[test]
    fn missing_flag_is_a_configuration_error() {
        let xml = "<configuration><center><latitude>1</latitude><longitude>2</longitude></center></configuration>";
        let err = parse_configuration_xml(xml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                field: "allowMultipleRoutes",
                ..
            }
        ));
    }

    #[test]
    fn parses_locations_document() {
        let directory = parse_locations_xml(LOCATIONS).unwrap();
        assert_eq!(directory.all_names(), vec!["Gym", "Library"]);

        let library = directory.lookup("library").unwrap();
        assert_eq!(library.name(), "Library");
        assert_eq!(
            library.full_street_address().as_deref(),
            Some("3420 Walnut St, Philadelphia, PA 19104")
        );
        assert_eq!(library.description(), Some("Main research library"));

        let gym = directory.lookup("gym").unwrap();
        assert_eq!(gym.street_address(), None);
        assert_eq!(gym.description(), None);
    }

    #[test]
    fn location_without_coordinates_fails_the_load() {
        let xml = "<locations><location><name>Gym</name></location></locations>";
        let err = parse_locations_xml(xml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                field: "latitude",
                ..
            }
        ));
    }

    #[test]
    fn malformed_xml_is_reported() {
        let err = parse_locations_xml("<locations><location>").unwrap_err();
        assert!(matches!(err, ConfigError::XmlParse { .. }));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = load_map_config(Path::new("/nonexistent/configuration.xml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/configuration.xml"));
    }

    #[test]
    fn clamp_zoom_only_lowers() {
        assert_eq!(clamp_zoom(17, 15), 15);
        assert_eq!(clamp_zoom(17, 20), 17);
    }
}
