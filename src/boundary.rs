//! Presentation boundary abstraction
//!
//! The rendering layer is a black box to the state machine: it receives the
//! boundary representation of the current results plus a render key, and
//! emits at most one interaction event per cycle. The boundary is stateless
//! across epoch changes — a changed render key forces it to discard any
//! local draft text or selection, which the machine relies on after
//! submit/reset/clear.

use std::collections::VecDeque;

use serde_json::Value;

use crate::Result;
use crate::event::BoundaryEvent;
use crate::options::DisplayOption;

/// Render inputs handed to the boundary each cycle
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Instance key concatenated with the render epoch
    pub render_key: String,
    /// Boundary representation of the current results, in relevance order
    pub options: Vec<DisplayOption>,
    /// JSON rendering of the current value, for display purposes
    pub current: Option<Value>,
}

/// Trait for presentation boundary implementations
///
/// This abstracts the specific rendering backend so an embedded component,
/// a TUI, or a test double can sit behind the same state machine.
pub trait PresentationBoundary {
    /// Render the widget and report the user interaction, if any
    ///
    /// `Ok(None)` means no new interaction since the previous render.
    ///
    /// # Errors
    ///
    /// Returns an error if the rendering surface fails.
    fn render(&mut self, request: &RenderRequest) -> Result<Option<BoundaryEvent>>;
}

/// Scripted boundary that replays predetermined interactions
///
/// Useful for testing and demos without a real rendering surface. Plays one
/// scripted event per render, then reports no interaction. Records every
/// render key it sees so tests can assert the epoch contract.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBoundary {
    script: VecDeque<BoundaryEvent>,
    /// Render keys observed, in order
    pub rendered_keys: Vec<String>,
    /// Option count of the most recent render
    pub last_option_count: usize,
}

impl ScriptedBoundary {
    /// Create a boundary that replays the given events in order
    #[must_use]
    pub fn new(script: Vec<BoundaryEvent>) -> Self {
        Self {
            script: script.into(),
            rendered_keys: Vec::new(),
            last_option_count: 0,
        }
    }

    /// Create a boundary that never reports an interaction
    #[must_use]
    pub fn idle() -> Self {
        Self::new(Vec::new())
    }

    /// Number of scripted events not yet replayed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl PresentationBoundary for ScriptedBoundary {
    fn render(&mut self, request: &RenderRequest) -> Result<Option<BoundaryEvent>> {
        self.rendered_keys.push(request.render_key.clone());
        self.last_option_count = request.options.len();
        Ok(self.script.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(key: &str) -> RenderRequest {
        RenderRequest {
            render_key: key.to_string(),
            options: vec![DisplayOption {
                id: "0".into(),
                title: "Abc".into(),
                description: String::new(),
                image: String::new(),
            }],
            current: None,
        }
    }

    #[test]
    fn test_scripted_boundary_replays_in_order() {
        let mut boundary = ScriptedBoundary::new(vec![
            BoundaryEvent::search("a"),
            BoundaryEvent::submit_index(0),
        ]);

        let first = boundary.render(&request("w:0")).unwrap();
        assert_eq!(first, Some(BoundaryEvent::search("a")));
        let second = boundary.render(&request("w:1")).unwrap();
        assert_eq!(second, Some(BoundaryEvent::submit_index(0)));
        assert_eq!(boundary.render(&request("w:1")).unwrap(), None);

        assert_eq!(boundary.rendered_keys, vec!["w:0", "w:1", "w:1"]);
        assert_eq!(boundary.last_option_count, 1);
        assert_eq!(boundary.remaining(), 0);
    }

    #[test]
    fn test_idle_boundary_reports_nothing() {
        let mut boundary = ScriptedBoundary::idle();
        assert_eq!(boundary.render(&request("w:0")).unwrap(), None);
    }
}
