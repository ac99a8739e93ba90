use thiserror::Error;

/// Errors raised while loading configuration: environment variables and the
/// two XML documents (map configuration and location list).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {document}: {source}")]
    XmlParse {
        document: &'static str,
        #[source]
        source: quick_xml::DeError,
    },

    /// A required element is absent or empty. `entry` identifies the element
    /// that owns the field (e.g. `location #3` or `center`).
    #[error("{document}: {entry} is missing required field <{field}>")]
    MissingField {
        document: &'static str,
        entry: String,
        field: &'static str,
    },

    #[error("{document}: {entry} has non-numeric <{field}> value '{value}'")]
    InvalidCoordinate {
        document: &'static str,
        entry: String,
        field: &'static str,
        value: String,
    },
}

/// Errors surfaced to the user while validating a route submission or
/// editing the waypoint list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("Both a starting and ending location are required.")]
    MissingRequiredField,

    /// Every raw name that failed lookup, in form order (start, waypoints, end).
    #[error(
        "The following locations couldn't be found. Please check your location names and spellings and try again:\n{}",
        .0.join("\n")
    )]
    UnresolvedLocations(Vec<String>),

    #[error("no more than {max} waypoints can be added")]
    WaypointLimit { max: usize },
}

/// Rejections from the fail-soft setters on [`crate::Coordinate`] and
/// [`crate::LocationRecord`]. The target value is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Name is a required field that takes a non-empty string value.")]
    EmptyName,

    #[error("{field} values must be numeric, got {value}")]
    NonNumeric { field: &'static str, value: f64 },
}
