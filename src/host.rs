//! Host rerun abstraction
//!
//! The widget never re-invokes the host script itself; it returns a
//! `RerunRequest` from the cycle and the host loop is responsible for
//! scheduling the next cycle. Requests are fire-and-forget: the machine
//! never waits for its own rerun.

use serde::{Deserialize, Serialize};

use crate::boundary::PresentationBoundary;
use crate::event::BoundaryEvent;
use crate::machine::{CycleOutcome, SearchSelect};
use crate::provider::SearchProvider;
use crate::state::StateStore;
use crate::{Result, SelectValue};

/// How much of the host script a rerun re-executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerunScope {
    /// Re-execute the whole host cycle
    #[default]
    Full,
    /// Re-execute only the fragment containing the widget
    Fragment,
}

/// What the host environment is able to rerun
///
/// Older hosts only support whole-cycle reruns; the machine falls back to
/// `Full` when a fragment rerun is configured but unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostCapabilities {
    /// Whether the host supports localized fragment reruns
    pub fragment_rerun: bool,
}

impl HostCapabilities {
    /// A host that can only re-execute whole cycles
    #[must_use]
    pub const fn full_only() -> Self {
        Self {
            fragment_rerun: false,
        }
    }

    /// A host that supports localized fragment reruns
    #[must_use]
    pub const fn with_fragment_rerun() -> Self {
        Self {
            fragment_rerun: true,
        }
    }
}

/// A request for the host to schedule another cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RerunRequest {
    /// Scope the host should re-execute
    pub scope: RerunScope,
}

impl RerunRequest {
    /// Resolve the configured scope against host capability
    ///
    /// Picks the narrower fragment scope when both configured and supported,
    /// otherwise falls back to a full rerun.
    #[must_use]
    pub const fn resolve(preferred: RerunScope, caps: HostCapabilities) -> Self {
        let scope = match preferred {
            RerunScope::Fragment if caps.fragment_rerun => RerunScope::Fragment,
            _ => RerunScope::Full,
        };
        Self { scope }
    }
}

/// Trait for host-side rerun signalling
///
/// Implementations forward the request to whatever mechanism the host uses
/// to schedule cycles. The call must not block on the rerun itself.
pub trait RerunTrigger {
    /// Ask the host to schedule another cycle
    fn request_rerun(&mut self, scope: RerunScope);
}

/// Drives widget cycles until no further rerun is requested
///
/// A convenience host loop for tests and embedded demos: renders the
/// boundary, applies the resulting event, and keeps cycling while the
/// machine requests reruns, up to a cycle budget.
#[derive(Debug, Clone, Copy)]
pub struct CycleDriver {
    max_cycles: usize,
    caps: HostCapabilities,
}

impl CycleDriver {
    /// Create a driver with the given cycle budget
    #[must_use]
    pub const fn new(max_cycles: usize, caps: HostCapabilities) -> Self {
        Self { max_cycles, caps }
    }

    /// Run cycles until the machine stops requesting reruns
    ///
    /// Returns the outcome of the last executed cycle. The budget caps
    /// runaway rerun loops; when it is exhausted the last outcome is
    /// returned as-is, mirroring a host that simply stops scheduling.
    ///
    /// # Errors
    ///
    /// Propagates any cycle error; the failing cycle left no state commit.
    pub fn run<V: SelectValue>(
        &self,
        widget: &mut SearchSelect<V>,
        store: &mut StateStore<V>,
        boundary: &mut dyn PresentationBoundary,
        provider: &mut dyn SearchProvider<V>,
    ) -> Result<CycleOutcome<V>> {
        let mut outcome = CycleOutcome::idle(None);

        for _ in 0..self.max_cycles.max(1) {
            let request = widget.render_request(store);
            let event = boundary.render(&request)?.and_then(BoundaryEvent::into_event);
            outcome = widget.run_cycle(store, event, provider, self.caps)?;
            if outcome.rerun.is_none() {
                break;
            }
        }

        Ok(outcome)
    }
}
