//! Campus location model: a named point with optional postal details.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// A point on Earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Updates the latitude. Non-finite values are rejected and the current
    /// latitude is kept.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NonNumeric`] for `NaN` or infinite input.
    pub fn set_latitude(&mut self, latitude: f64) -> Result<(), FieldError> {
        if !latitude.is_finite() {
            return Err(FieldError::NonNumeric {
                field: "Latitude",
                value: latitude,
            });
        }
        self.latitude = latitude;
        Ok(())
    }

    /// Updates the longitude. Non-finite values are rejected and the current
    /// longitude is kept.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NonNumeric`] for `NaN` or infinite input.
    pub fn set_longitude(&mut self, longitude: f64) -> Result<(), FieldError> {
        if !longitude.is_finite() {
            return Err(FieldError::NonNumeric {
                field: "Longitude",
                value: longitude,
            });
        }
        self.longitude = longitude;
        Ok(())
    }

    /// `lat,lng` form used in directions query strings.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Lookup key for a location name: surrounding whitespace removed, lowercased.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A named campus location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    name: String,
    normalized_key: String,
    coordinate: Coordinate,
    street_address: Option<String>,
    city_state_zip: Option<String>,
    description: Option<String>,
}

impl LocationRecord {
    /// Builds a record with no optional details.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::EmptyName`] when `name` is blank.
    pub fn new(name: &str, coordinate: Coordinate) -> Result<Self, FieldError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FieldError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            normalized_key: normalize_name(name),
            coordinate,
            street_address: None,
            city_state_zip: None,
            description: None,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn normalized_key(&self) -> &str {
        &self.normalized_key
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[must_use]
    pub fn street_address(&self) -> Option<&str> {
        self.street_address.as_deref()
    }

    #[must_use]
    pub fn city_state_zip(&self) -> Option<&str> {
        self.city_state_zip.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// `"{street}, {city_state_zip}"`, only when both parts are known.
    #[must_use]
    pub fn full_street_address(&self) -> Option<String> {
        match (self.street_address(), self.city_state_zip()) {
            (Some(street), Some(city)) => Some(format!("{street}, {city}")),
            _ => None,
        }
    }

    /// Renames the location, keeping the lookup key in sync. A blank name is
    /// rejected and the record is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::EmptyName`] when `name` is blank.
    pub fn set_name(&mut self, name: &str) -> Result<(), FieldError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FieldError::EmptyName);
        }
        self.name = name.to_string();
        self.normalized_key = normalize_name(name);
        Ok(())
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.coordinate = coordinate;
    }

    pub fn set_street_address(&mut self, value: Option<&str>) {
        self.street_address = non_blank(value);
    }

    pub fn set_city_state_zip(&mut self, value: Option<&str>) {
        self.city_state_zip = non_blank(value);
    }

    pub fn set_description(&mut self, value: Option<&str>) {
        self.description = non_blank(value);
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}
