//! The in-memory Location Directory: normalized name → [`LocationRecord`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::location::{normalize_name, Coordinate, LocationRecord};

pub(crate) const LOCATIONS_DOCUMENT: &str = "locations.xml";

/// One `<location>` entry as it appears in the configuration, before
/// validation. Every field is optional here so that a missing required field
/// can be reported by name instead of as a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coordinates: Option<RawCoordinates>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default, rename = "cityStateZip")]
    pub city_state_zip: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoordinates {
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
}

/// `{id, text}` pair used to seed a select/typeahead widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionItem {
    pub id: String,
    pub text: String,
}

/// Read-only set of configured campus locations, keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct LocationDirectory {
    entries: BTreeMap<String, LocationRecord>,
}

impl LocationDirectory {
    /// Builds the directory from raw configuration entries.
    ///
    /// Names are trimmed; the lookup key is the lowercased name. Optional
    /// fields are kept only when non-empty after trimming. A later entry with
    /// the same normalized name replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if any entry lacks a name,
    /// latitude or longitude, and [`ConfigError::InvalidCoordinate`] if a
    /// coordinate is not numeric. Nothing is loaded in either case.
    pub fn load<I>(records: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = RawLocation>,
    {
        let mut entries = BTreeMap::new();

        for (index, raw) in records.into_iter().enumerate() {
            let record = build_record(index + 1, raw)?;
            let key = record.normalized_key().to_string();
            if let Some(previous) = entries.insert(key, record) {
                tracing::warn!(
                    name = previous.name(),
                    "duplicate location name in configuration; keeping the later entry"
                );
            }
        }

        tracing::debug!(count = entries.len(), "location directory loaded");
        Ok(Self { entries })
    }

    /// Case-insensitive exact match on the trimmed name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&LocationRecord> {
        self.entries.get(&normalize_name(name))
    }

    /// Display names sorted case-insensitively, by their trimmed lowercase
    /// key, so `"alpha"` comes before `"Zeta"`.
    #[must_use]
    pub fn all_names(&self) -> Vec<String> {
        self.entries
            .values()
            .map(|record| record.name().to_string())
            .collect()
    }

    #[must_use]
    pub fn suggestion_items(&self) -> Vec<SuggestionItem> {
        self.entries
            .iter()
            .map(|(key, record)| SuggestionItem {
                id: key.clone(),
                text: record.name().to_string(),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationRecord> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn build_record(position: usize, raw: RawLocation) -> Result<LocationRecord, ConfigError> {
    let entry = format!("location #{position}");

    let name = required_text(raw.name.as_deref(), &entry, "name")?;
    let entry = format!("location '{name}'");

    let coordinates = raw.coordinates.unwrap_or_default();
    let latitude = parse_degrees_in(
        LOCATIONS_DOCUMENT,
        coordinates.latitude.as_deref(),
        &entry,
        "latitude",
    )?;
    let longitude = parse_degrees_in(
        LOCATIONS_DOCUMENT,
        coordinates.longitude.as_deref(),
        &entry,
        "longitude",
    )?;

    let mut record = LocationRecord::new(name, Coordinate::new(latitude, longitude))
        .map_err(|_| missing(&entry, "name"))?;
    record.set_street_address(raw.street.as_deref());
    record.set_city_state_zip(raw.city_state_zip.as_deref());
    record.set_description(raw.description.as_deref());
    Ok(record)
}

fn required_text<'a>(
    value: Option<&'a str>,
    entry: &str,
    field: &'static str,
) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(entry, field))
}

pub(crate) fn parse_degrees_in(
    document: &'static str,
    value: Option<&str>,
    entry: &str,
    field: &'static str,
) -> Result<f64, ConfigError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingField {
            document,
            entry: entry.to_string(),
            field,
        })?;

    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::InvalidCoordinate {
            document,
            entry: entry.to_string(),
            field,
            value: raw.to_string(),
        })
}

fn missing(entry: &str, field: &'static str) -> ConfigError {
    ConfigError::MissingField {
        document: LOCATIONS_DOCUMENT,
        entry: entry.to_string(),
        field,
    }
}
