//! Selection state machine
//!
//! This module implements the per-cycle transition function behind the
//! widget: load or initialize the instance state, apply at most one
//! interaction event, decide whether the search provider runs, and decide
//! whether the host should schedule another cycle.
//!
//! # Workflow
//!
//! ```text
//! Host cycle starts
//!     ↓
//! load / initialize WidgetState for key
//!     ↓
//! pending submit from a prior search? → apply it first
//!     ↓
//! Event?
//!     ├─ none          → no state change
//!     ├─ search(text)  → dedupe against last_query, invoke provider,
//!     │                  store results, bump epoch, honor latency floor
//!     ├─ submit(v)     → resolve value, commit if changed, fire on_submit
//!     └─ reset         → back to defaults, fire on_reset
//!     ↓
//! commit whole state → return (value, rerun request)
//! ```
//!
//! Writes are atomic with respect to the store: the machine mutates a
//! working copy and commits it only when the cycle succeeds, so a failing
//! provider leaves the previous state visible to the next cycle.

use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, trace};

use crate::boundary::RenderRequest;
use crate::config::{SubmitMode, WidgetConfig};
use crate::event::WidgetEvent;
use crate::host::{HostCapabilities, RerunRequest};
use crate::options::ResultSet;
use crate::provider::SearchProvider;
use crate::state::{StateStore, WidgetState};
use crate::{Result, SelectError, SelectValue};

/// What one cycle hands back to the host
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome<V> {
    /// The widget's current value, visible to the caller this cycle
    pub value: Option<V>,
    /// Rerun request for the host loop, if any
    pub rerun: Option<RerunRequest>,
}

impl<V> CycleOutcome<V> {
    /// An outcome that requests nothing from the host
    #[must_use]
    pub const fn idle(value: Option<V>) -> Self {
        Self { value, rerun: None }
    }
}

/// One search-select widget instance
///
/// Owns the instance key and configuration; the per-session state lives in
/// the host-provided [`StateStore`].
pub struct SearchSelect<V> {
    key: String,
    config: WidgetConfig<V>,
}

impl<V: SelectValue> SearchSelect<V> {
    /// Create a widget instance with the given key and configuration
    #[must_use]
    pub fn new(key: impl Into<String>, config: WidgetConfig<V>) -> Self {
        Self {
            key: key.into(),
            config,
        }
    }

    /// The widget's instance key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The widget's configuration
    #[must_use]
    pub const fn config(&self) -> &WidgetConfig<V> {
        &self.config
    }

    /// Build the render inputs for the presentation boundary this cycle
    ///
    /// Uses the stored state when one exists, otherwise the defaults the
    /// first cycle would initialize with.
    #[must_use]
    pub fn render_request(&self, store: &StateStore<V>) -> RenderRequest {
        let fallback;
        let state = match store.get(&self.key) {
            Some(state) => state,
            None => {
                fallback = self.initial_state();
                &fallback
            }
        };

        RenderRequest {
            render_key: state.render_key(&self.key),
            options: state.results.display().to_vec(),
            current: state
                .current_value
                .as_ref()
                .and_then(|v| serde_json::to_value(v).ok()),
        }
    }

    /// Apply one host cycle
    ///
    /// The single per-cycle transition function: consumes at most one event,
    /// invokes the provider when a genuinely new query arrives, and reports
    /// the current value plus any rerun request back to the host.
    ///
    /// # Errors
    ///
    /// Provider failures, out-of-range index submits, and undecodable submit
    /// payloads abort the cycle with no state commit.
    pub fn run_cycle(
        &mut self,
        store: &mut StateStore<V>,
        event: Option<WidgetEvent>,
        provider: &mut dyn SearchProvider<V>,
        caps: HostCapabilities,
    ) -> Result<CycleOutcome<V>> {
        let mut state = match store.get(&self.key) {
            Some(state) => state.clone(),
            None => {
                debug!(key = %self.key, "initializing widget state");
                self.initial_state()
            }
        };
        let mut rerun = None;

        // A search from the previous cycle flagged an implicit submit; apply
        // it before any new user input so the captured intent is not lost.
        if state.pending_submit_after_search {
            let payload = state.take_pending_submit();
            debug!(key = %self.key, "applying pending submit after search");
            self.submit_transition(&mut state, payload, caps, &mut rerun)?;
        }

        match event {
            None => {}
            Some(WidgetEvent::Search(text)) => {
                if text == state.last_query {
                    trace!(key = %self.key, query = %text, "duplicate search suppressed");
                } else {
                    let started = Instant::now();
                    self.search_transition(&mut state, text, provider)?;
                    if self.config.rerun_on_update {
                        self.enforce_latency_floor(started.elapsed());
                        rerun = Some(RerunRequest::resolve(self.config.rerun_scope, caps));
                    }
                }
            }
            Some(WidgetEvent::Submit(payload)) => {
                self.submit_transition(&mut state, payload, caps, &mut rerun)?;
            }
            Some(WidgetEvent::Reset) => {
                self.reset_transition(&mut state);
                if self.config.rerun_on_update {
                    rerun = Some(RerunRequest::resolve(self.config.rerun_scope, caps));
                }
            }
        }

        let value = state.current_value.clone();
        store.commit(&self.key, state);
        Ok(CycleOutcome { value, rerun })
    }

    /// Fresh state from the configured defaults
    fn initial_state(&self) -> WidgetState<V> {
        WidgetState::initialize(
            ResultSet::normalize(self.config.default_options.clone()),
            self.config.default_value.clone(),
        )
    }

    /// Process a new query through the provider and store the results
    fn search_transition(
        &mut self,
        state: &mut WidgetState<V>,
        text: String,
        provider: &mut dyn SearchProvider<V>,
    ) -> Result<()> {
        let fetched = provider
            .search(&text, &self.config.extra_args)
            .map_err(SelectError::Provider)?;
        let results = ResultSet::normalize(fetched.unwrap_or_default());
        debug!(key = %self.key, query = %text, hits = results.len(), "search completed");

        state.last_query.clone_from(&text);
        // Epoch moves only when the content actually changed, so a re-search
        // yielding identical results does not cost the boundary its draft.
        if results != state.results {
            state.epoch.bump();
        }
        state.results = results;

        if self.config.submit_after_search {
            state.set_pending_submit(Value::String(text));
        }
        Ok(())
    }

    /// Resolve a submit payload and commit it if it changes the value
    fn submit_transition(
        &mut self,
        state: &mut WidgetState<V>,
        payload: Value,
        caps: HostCapabilities,
        rerun: &mut Option<RerunRequest>,
    ) -> Result<()> {
        let index_form = match (self.config.submit_mode, &payload) {
            (SubmitMode::IndexResolved, Value::Number(n)) => n.as_u64(),
            _ => None,
        };

        let resolved: V = if let Some(raw) = index_form {
            let index = usize::try_from(raw).unwrap_or(usize::MAX);
            state
                .results
                .value_at(index)
                .cloned()
                .ok_or(SelectError::IndexOutOfRange {
                    index,
                    len: state.results.len(),
                })?
        } else {
            serde_json::from_value(payload)?
        };

        if state.current_value.as_ref() == Some(&resolved) {
            trace!(key = %self.key, "submit suppressed, value unchanged");
        } else {
            debug!(key = %self.key, "submit committed");
            state.current_value = Some(resolved.clone());
            if let Some(on_submit) = self.config.on_submit.as_mut() {
                on_submit(&resolved);
            }
        }

        if self.config.clear_on_submit {
            self.clear_surface(state);
            *rerun = Some(RerunRequest::resolve(self.config.rerun_scope, caps));
        }
        Ok(())
    }

    /// Reset the whole widget back to its configured defaults
    fn reset_transition(&mut self, state: &mut WidgetState<V>) {
        debug!(key = %self.key, "widget reset");
        state.current_value = self.config.default_value.clone();
        self.clear_surface(state);
        if let Some(on_reset) = self.config.on_reset.as_mut() {
            on_reset();
        }
    }

    /// Clear the search surface: results, query, and any pending submit
    ///
    /// Bumps the epoch unconditionally — the clean slate after submit/reset
    /// is exactly the case where the boundary must drop its draft.
    fn clear_surface(&mut self, state: &mut WidgetState<V>) {
        state.results = ResultSet::empty();
        state.last_query.clone_from(&self.config.default_searchterm);
        state.epoch.bump();
        let _ = state.take_pending_submit();
    }

    /// Block the cycle until the configured minimum latency has passed
    ///
    /// UX smoothing against flicker on sub-millisecond searches; a blocking
    /// sleep on the single-threaded cycle, never a background timer.
    fn enforce_latency_floor(&self, elapsed: Duration) {
        let floor = self.config.min_execution_time;
        if elapsed < floor {
            thread::sleep(floor - elapsed);
        }
    }
}
