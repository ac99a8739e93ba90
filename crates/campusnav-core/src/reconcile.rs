//! Waypoint List Reconciler.
//!
//! Turns the raw text of the optional waypoint fields into resolved
//! [`LocationRecord`]s plus the list of names that failed lookup.

use crate::directory::LocationDirectory;
use crate::location::LocationRecord;

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation<'a> {
    /// Records for the non-blank entries that resolved, in input order.
    pub resolved: Vec<&'a LocationRecord>,
    /// Raw text of the non-blank entries that did not resolve, in input order.
    pub invalid: Vec<String>,
}

impl Reconciliation<'_> {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Display names of the resolved records.
    #[must_use]
    pub fn resolved_names(&self) -> Vec<String> {
        self.resolved
            .iter()
            .map(|record| record.name().to_string())
            .collect()
    }
}

/// Resolves each non-blank entry of `raw_values` against `directory`.
///
/// Blank and whitespace-only entries are skipped without error. An empty
/// input yields an empty, valid reconciliation.
#[must_use]
pub fn reconcile<'a, S>(raw_values: &[S], directory: &'a LocationDirectory) -> Reconciliation<'a>
where
    S: AsRef<str>,
{
    let mut resolved = Vec::new();
    let mut invalid = Vec::new();

    for raw in raw_values.iter().map(AsRef::as_ref) {
        if raw.trim().is_empty() {
            continue;
        }
        match directory.lookup(raw) {
            Some(record) => resolved.push(record),
            None => invalid.push(raw.to_string()),
        }
    }

    if !invalid.is_empty() {
        tracing::debug!(invalid = ?invalid, "waypoints failed lookup");
    }

    Reconciliation { resolved, invalid }
}
