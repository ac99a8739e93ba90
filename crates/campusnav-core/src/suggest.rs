//! Autosuggest controller for a single free-text location field.
//!
//! The controller is a small state machine driven by keyboard and mouse
//! events. It holds the field's current text, the candidate list computed
//! from the last keystroke, and the keyboard-highlighted index:
//!
//! - `Idle`: no list shown.
//! - `Suggesting`: list shown, nothing selected by keyboard.
//! - `Navigating`: list shown, `current_index` points into it.
//!
//! Arrow keys preview the highlighted candidate in the field; Enter/Tab or a
//! click commits; Escape restores what the user typed. Hovering a candidate
//! moves the visual highlight only and leaves `current_index` alone, so the
//! next arrow key continues from the last keyboard position.

use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestState {
    Idle,
    Suggesting,
    Navigating,
}

/// Keys the autosuggest controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Tab,
    Escape,
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" | "arrowdown" => Ok(Self::ArrowDown),
            "up" | "arrowup" => Ok(Self::ArrowUp),
            "enter" | "return" => Ok(Self::Enter),
            "tab" => Ok(Self::Tab),
            "escape" | "esc" => Ok(Self::Escape),
            other => Err(format!("unknown key '{other}'")),
        }
    }
}

/// Every name whose lowercase form contains the lowercase query, in the
/// order of `all_names`. An empty query matches nothing.
#[must_use]
pub fn filter_candidates<S: AsRef<str>>(query: &str, all_names: &[S]) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    all_names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| name.to_lowercase().contains(&needle))
        .map(ToOwned::to_owned)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SuggestController {
    value: String,
    typed: String,
    candidates: Vec<String>,
    current_index: Option<usize>,
    hover_index: Option<usize>,
}

impl SuggestController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SuggestState {
        match (self.candidates.is_empty(), self.current_index) {
            (true, _) => SuggestState::Idle,
            (false, None) => SuggestState::Suggesting,
            (false, Some(_)) => SuggestState::Navigating,
        }
    }

    /// Text currently shown in the field.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the field text without opening the list, e.g. when the form
    /// is filled programmatically.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.typed.clone_from(&self.value);
        self.clear();
    }

    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The single visually highlighted candidate. A hover wins over the
    /// keyboard position until the next arrow key.
    #[must_use]
    pub fn highlighted(&self) -> Option<usize> {
        self.hover_index.or(self.current_index)
    }

    /// Recomputes the candidate list for `query` (the field's new text).
    ///
    /// The keyboard position is reset. An empty query or an empty result
    /// returns the controller to `Idle`.
    pub fn on_text_changed<S: AsRef<str>>(&mut self, query: &str, all_names: &[S]) -> &[String] {
        self.value = query.to_string();
        self.typed = query.to_string();
        self.current_index = None;
        self.hover_index = None;
        self.candidates = filter_candidates(query, all_names);
        &self.candidates
    }

    /// Dispatches a navigation or commit key to its handler.
    pub fn on_key(&mut self, key: FieldKey) {
        match key {
            FieldKey::ArrowDown => {
                self.on_arrow_down();
            }
            FieldKey::ArrowUp => {
                self.on_arrow_up();
            }
            FieldKey::Enter | FieldKey::Tab => {
                self.on_enter_or_tab();
            }
            FieldKey::Escape => self.on_escape(),
        }
    }

    /// Moves the highlight down, wrapping from the last candidate to the
    /// first; starts at the first when nothing is highlighted yet. The
    /// highlighted candidate is written into the field.
    pub fn on_arrow_down(&mut self) -> Option<usize> {
        let len = self.candidates.len();
        if len == 0 {
            return None;
        }
        let next = match self.current_index {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.highlight(next)
    }

    /// Moves the highlight up, wrapping from the first candidate to the
    /// last; starts at the last when nothing is highlighted yet.
    pub fn on_arrow_up(&mut self) -> Option<usize> {
        let len = self.candidates.len();
        if len == 0 {
            return None;
        }
        let next = match self.current_index {
            Some(i) if i > 0 && i < len => i - 1,
            _ => len - 1,
        };
        self.highlight(next)
    }

    /// Commits the highlighted candidate, or keeps the typed text when none
    /// is highlighted, and closes the list. Returns the committed value.
    pub fn on_enter_or_tab(&mut self) -> &str {
        if let Some(candidate) = self.current_index.and_then(|i| self.candidates.get(i)) {
            self.value.clone_from(candidate);
        }
        self.commit()
    }

    /// Restores the text typed before navigation began and closes the list.
    pub fn on_escape(&mut self) {
        self.value.clone_from(&self.typed);
        self.clear();
    }

    /// Commits a clicked candidate and closes the list.
    pub fn on_mouse_select(&mut self, candidate: &str) -> &str {
        self.value = candidate.to_string();
        self.commit()
    }

    /// Highlights the hovered candidate without changing `current_index`.
    pub fn on_mouse_hover(&mut self, index: usize) {
        if index < self.candidates.len() {
            self.hover_index = Some(index);
        }
    }

    fn highlight(&mut self, index: usize) -> Option<usize> {
        self.current_index = Some(index);
        self.hover_index = None;
        self.value.clone_from(&self.candidates[index]);
        Some(index)
    }

    fn commit(&mut self) -> &str {
        self.typed.clone_from(&self.value);
        self.clear();
        &self.value
    }

    fn clear(&mut self) {
        self.candidates.clear();
        self.current_index = None;
        self.hover_index = None;
    }
}

/// Offset geometry of one element: its position relative to its offset
/// parent, and its rendered size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OffsetBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// Where the suggestion list is drawn, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopupPlacement {
    pub left: i32,
    pub top: i32,
    pub width: i32,
}

/// Places the list directly below `field`, left-aligned with it and as wide
/// as it. `ancestors` is the field's offset-parent chain up to the page root.
#[must_use]
pub fn popup_placement(field: OffsetBox, ancestors: &[OffsetBox]) -> PopupPlacement {
    let (left, top) = ancestors
        .iter()
        .fold((field.left, field.top), |(left, top), parent| {
            (left + parent.left, top + parent.top)
        });
    PopupPlacement {
        left,
        top: top + field.height,
        width: field.width,
    }
}

#[cfg(test)]
#[path = "suggest_test.rs"]
mod tests;
