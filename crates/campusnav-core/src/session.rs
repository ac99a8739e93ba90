//! Per-page navigator session.
//!
//! Owns everything a single navigation page works with: the shared location
//! directory, map settings, the route form, one autosuggest controller per
//! endpoint field, and the submission counter used to discard responses to
//! superseded submissions.

use std::sync::Arc;

use crate::directory::LocationDirectory;
use crate::documents::MapConfig;
use crate::error::NavError;
use crate::form::RouteForm;
use crate::location::LocationRecord;
use crate::reconcile::reconcile;
use crate::route::{plan_route, DirectionsRequest};
use crate::suggest::{FieldKey, SuggestController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

/// A validated submission ready to be sent to the directions service.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub ticket: u64,
    pub request: DirectionsRequest,
    /// Stops in travel order, for rendering the result.
    pub stops: Vec<LocationRecord>,
}

/// Result of matching a directions response to the submission it answers.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion<T> {
    Current(T),
    /// A newer submission was made after this one; the response is stale.
    Superseded { ticket: u64, latest: u64 },
}

#[derive(Debug)]
pub struct NavigatorSession {
    directory: Arc<LocationDirectory>,
    map: MapConfig,
    form: RouteForm,
    start_field: SuggestController,
    end_field: SuggestController,
    all_names: Vec<String>,
    latest_ticket: u64,
}

impl NavigatorSession {
    #[must_use]
    pub fn new(directory: Arc<LocationDirectory>, map: MapConfig) -> Self {
        let all_names = directory.all_names();
        Self {
            directory,
            map,
            form: RouteForm::default(),
            start_field: SuggestController::new(),
            end_field: SuggestController::new(),
            all_names,
            latest_ticket: 0,
        }
    }

    #[must_use]
    pub fn directory(&self) -> &LocationDirectory {
        &self.directory
    }

    #[must_use]
    pub fn map(&self) -> &MapConfig {
        &self.map
    }

    #[must_use]
    pub fn form(&self) -> &RouteForm {
        &self.form
    }

    #[must_use]
    pub fn field(&self, endpoint: Endpoint) -> &SuggestController {
        match endpoint {
            Endpoint::Start => &self.start_field,
            Endpoint::End => &self.end_field,
        }
    }

    /// Handles a keystroke that changed the text of an endpoint field and
    /// returns the suggestions to show.
    pub fn type_text(&mut self, endpoint: Endpoint, text: &str) -> Vec<String> {
        let all_names = &self.all_names;
        let field = match endpoint {
            Endpoint::Start => &mut self.start_field,
            Endpoint::End => &mut self.end_field,
        };
        let candidates = field.on_text_changed(text, all_names).to_vec();
        self.sync(endpoint);
        candidates
    }

    /// Handles a navigation or commit key in an endpoint field.
    pub fn press(&mut self, endpoint: Endpoint, key: FieldKey) {
        self.field_mut(endpoint).on_key(key);
        self.sync(endpoint);
    }

    pub fn hover_suggestion(&mut self, endpoint: Endpoint, index: usize) {
        self.field_mut(endpoint).on_mouse_hover(index);
    }

    pub fn click_suggestion(&mut self, endpoint: Endpoint, candidate: &str) {
        self.field_mut(endpoint).on_mouse_select(candidate);
        self.sync(endpoint);
    }

    pub fn swap_endpoints(&mut self) {
        self.form.swap_endpoints();
        self.start_field.set_value(self.form.start.clone());
        self.end_field.set_value(self.form.end.clone());
    }

    /// Adds an empty waypoint slot and returns its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::WaypointLimit`] when all slots are in use.
    pub fn add_waypoint(&mut self) -> Result<usize, NavError> {
        self.form.waypoints.add()
    }

    pub fn remove_waypoint(&mut self) -> Option<String> {
        self.form.waypoints.remove_last()
    }

    pub fn set_waypoint(&mut self, number: usize, text: &str) -> bool {
        self.form.waypoints.set(number, text)
    }

    /// Validates the form and prepares a directions request.
    ///
    /// Open suggestion lists are closed first. Only a successful submission
    /// compacts the waypoint slots to the resolved names; on any error the
    /// form keeps exactly what the user typed.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::MissingRequiredField`] or
    /// [`NavError::UnresolvedLocations`] from route validation.
    pub fn submit(&mut self) -> Result<Submission, NavError> {
        self.start_field.set_value(self.form.start.clone());
        self.end_field.set_value(self.form.end.clone());

        let directory = Arc::clone(&self.directory);
        let plan = plan_route(&self.form, &directory)?;
        let request = plan.directions_request(self.map.allow_multiple_routes);
        let stops: Vec<LocationRecord> = plan.stops().into_iter().cloned().collect();

        let waypoints = reconcile(self.form.waypoints.values(), &directory);
        self.form.waypoints.apply(&waypoints);
        self.latest_ticket += 1;

        tracing::debug!(
            ticket = self.latest_ticket,
            stops = stops.len(),
            "route submitted"
        );

        Ok(Submission {
            ticket: self.latest_ticket,
            request,
            stops,
        })
    }

    /// Accepts `value` only if it answers the most recent submission.
    pub fn complete<T>(&self, ticket: u64, value: T) -> Completion<T> {
        if ticket == self.latest_ticket {
            Completion::Current(value)
        } else {
            tracing::debug!(
                ticket,
                latest = self.latest_ticket,
                "discarding response to superseded submission"
            );
            Completion::Superseded {
                ticket,
                latest: self.latest_ticket,
            }
        }
    }

    fn field_mut(&mut self, endpoint: Endpoint) -> &mut SuggestController {
        match endpoint {
            Endpoint::Start => &mut self.start_field,
            Endpoint::End => &mut self.end_field,
        }
    }

    fn sync(&mut self, endpoint: Endpoint) {
        match endpoint {
            Endpoint::Start => self.form.start = self.start_field.value().to_string(),
            Endpoint::End => self.form.end = self.end_field.value().to_string(),
        }
    }
}
