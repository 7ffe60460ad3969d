//! Boundary event schema
//!
//! The presentation boundary reports at most one interaction per host cycle
//! as a tagged `{interaction, value}` record. `BoundaryEvent` is the wire
//! shape (serde, JSON-friendly); `WidgetEvent` is the typed form consumed by
//! the state machine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of interaction reported by the presentation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interaction {
    /// User edited the search text
    Search,
    /// User committed a selection (by index or raw value)
    Submit,
    /// User cleared the widget
    Reset,
}

/// One interaction record as emitted by the boundary
///
/// `interaction: None` means the boundary rendered without any new user
/// interaction since the previous cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryEvent {
    /// What the user did, if anything
    pub interaction: Option<Interaction>,
    /// Event payload: search text, submitted index, or submitted raw value
    #[serde(default)]
    pub value: Value,
}

impl BoundaryEvent {
    /// A render with no new interaction
    #[must_use]
    pub const fn none() -> Self {
        Self {
            interaction: None,
            value: Value::Null,
        }
    }

    /// A search interaction carrying the current search text
    #[must_use]
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            interaction: Some(Interaction::Search),
            value: Value::String(text.into()),
        }
    }

    /// A submit interaction in index form
    #[must_use]
    pub fn submit_index(index: usize) -> Self {
        Self {
            interaction: Some(Interaction::Submit),
            value: Value::from(index as u64),
        }
    }

    /// A submit interaction carrying a raw value
    #[must_use]
    pub fn submit_value(value: Value) -> Self {
        Self {
            interaction: Some(Interaction::Submit),
            value,
        }
    }

    /// A reset interaction
    #[must_use]
    pub const fn reset() -> Self {
        Self {
            interaction: Some(Interaction::Reset),
            value: Value::Null,
        }
    }

    /// Convert the wire shape into the typed event consumed by the machine
    ///
    /// Returns `None` when no interaction happened. A search payload that is
    /// not a JSON string is treated as empty text.
    #[must_use]
    pub fn into_event(self) -> Option<WidgetEvent> {
        match self.interaction? {
            Interaction::Search => {
                let text = match self.value {
                    Value::String(s) => s,
                    _ => String::new(),
                };
                Some(WidgetEvent::Search(text))
            }
            Interaction::Submit => Some(WidgetEvent::Submit(self.value)),
            Interaction::Reset => Some(WidgetEvent::Reset),
        }
    }
}

/// Typed interaction event consumed by the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// Search text changed; the machine decides whether the provider runs
    Search(String),
    /// Selection committed; payload is resolved per the configured submit mode
    Submit(Value),
    /// Widget cleared back to defaults
    Reset,
}
