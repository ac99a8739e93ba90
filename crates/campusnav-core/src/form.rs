//! State of the route form: start and end fields plus 0..=8 waypoint slots.

use serde::{Deserialize, Serialize};

use crate::error::NavError;
use crate::reconcile::Reconciliation;

/// The directions service accepts ten locations per request: start, end and
/// at most this many waypoints.
pub const WAYPOINT_MAX: usize = 8;

/// Ordered waypoint input fields, numbered from 1 for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct WaypointSlots {
    values: Vec<String>,
}

impl TryFrom<Vec<String>> for WaypointSlots {
    type Error = NavError;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_values(values)
    }
}

impl From<WaypointSlots> for Vec<String> {
    fn from(slots: WaypointSlots) -> Self {
        slots.values
    }
}

impl WaypointSlots {
    /// Slots pre-filled with `values`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::WaypointLimit`] for more than [`WAYPOINT_MAX`] values.
    pub fn from_values<I, S>(values: I) -> Result<Self, NavError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.len() > WAYPOINT_MAX {
            return Err(NavError::WaypointLimit { max: WAYPOINT_MAX });
        }
        Ok(Self { values })
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn can_add(&self) -> bool {
        self.values.len() < WAYPOINT_MAX
    }

    #[must_use]
    pub fn can_remove(&self) -> bool {
        !self.values.is_empty()
    }

    /// Appends an empty slot and returns its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::WaypointLimit`] when all slots are in use.
    pub fn add(&mut self) -> Result<usize, NavError> {
        if !self.can_add() {
            return Err(NavError::WaypointLimit { max: WAYPOINT_MAX });
        }
        self.values.push(String::new());
        Ok(self.values.len())
    }

    /// Removes the last slot, returning its content.
    pub fn remove_last(&mut self) -> Option<String> {
        self.values.pop()
    }

    /// Sets the text of slot `number` (1-based). Returns `false` if there is
    /// no such slot.
    pub fn set(&mut self, number: usize, value: impl Into<String>) -> bool {
        match number.checked_sub(1).and_then(|i| self.values.get_mut(i)) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Label shown next to slot `number`.
    #[must_use]
    pub fn label(number: usize) -> String {
        format!("Destination {number}")
    }

    /// Commits a successful reconciliation: the slots become exactly the
    /// resolved display names, renumbered from 1. An unsuccessful one leaves
    /// the slots as the user typed them. Returns whether the slots changed.
    pub fn apply(&mut self, reconciliation: &Reconciliation<'_>) -> bool {
        if !reconciliation.is_valid() {
            return false;
        }
        self.values = reconciliation.resolved_names();
        true
    }
}

/// Raw contents of the route form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub waypoints: WaypointSlots,
}

impl RouteForm {
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            waypoints: WaypointSlots::default(),
        }
    }

    /// Exchanges the start and end field values.
    pub fn swap_endpoints(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }
}
