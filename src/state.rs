//! Widget state records and the per-key state store
//!
//! One `WidgetState` per widget instance key, owned exclusively by the state
//! machine and surviving host re-executions through a `StateStore` context
//! object. The store is explicit — never a hidden global — and is handed into
//! every cycle by the host.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::options::ResultSet;

/// Render epoch token
///
/// Changes whenever the boundary's underlying result set changes, forcing the
/// presentation boundary to treat the next render as a fresh instance instead
/// of stale-matching it against a prior one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderEpoch(u64);

impl RenderEpoch {
    /// Advance to the next epoch
    pub(crate) const fn bump(&mut self) {
        self.0 += 1;
    }

    /// Numeric value, for render-key construction and diagnostics
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Per-instance widget state, one record per instance key
#[derive(Debug, Clone)]
pub struct WidgetState<V> {
    /// Last committed selection; visible to the caller until changed
    pub current_value: Option<V>,
    /// Most recent search text already processed; suppresses duplicates
    pub last_query: String,
    /// Most recent results, in relevance order
    pub results: ResultSet<V>,
    /// Render epoch for boundary freshness
    pub epoch: RenderEpoch,
    /// A submit was implicitly requested before results arrived
    pub pending_submit_after_search: bool,
    /// Payload captured for the pending submit, applied next cycle
    pending_payload: Value,
}

impl<V: Serialize> WidgetState<V> {
    /// Initialize a fresh record for an instance key
    ///
    /// Called when no state exists for the key; never surfaced as an error.
    #[must_use]
    pub fn initialize(initial_results: ResultSet<V>, initial_value: Option<V>) -> Self {
        Self {
            current_value: initial_value,
            last_query: String::new(),
            results: initial_results,
            epoch: RenderEpoch::default(),
            pending_submit_after_search: false,
            pending_payload: Value::Null,
        }
    }

    /// Render key for the presentation boundary
    ///
    /// Epoch concatenated with the instance key; changing it forces the
    /// boundary to discard local draft state.
    #[must_use]
    pub fn render_key(&self, key: &str) -> String {
        format!("{key}:{}", self.epoch.value())
    }

    /// Flag a pending implicit submit, capturing its payload
    pub(crate) fn set_pending_submit(&mut self, payload: Value) {
        self.pending_submit_after_search = true;
        self.pending_payload = payload;
    }

    /// Clear the pending-submit flag, returning the captured payload
    pub(crate) fn take_pending_submit(&mut self) -> Value {
        self.pending_submit_after_search = false;
        std::mem::take(&mut self.pending_payload)
    }
}

/// Shared mutable session storage, keyed by widget instance key
///
/// Exactly one cycle executes at a time per session, so no locking is
/// required; the state machine keeps writes atomic by mutating a working
/// copy and committing it whole only when the cycle succeeds.
#[derive(Debug, Default)]
pub struct StateStore<V> {
    entries: HashMap<String, WidgetState<V>>,
}

impl<V> StateStore<V> {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// State record for an instance key, if one exists
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&WidgetState<V>> {
        self.entries.get(key)
    }

    /// Whether a record exists for the key
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop the record for an instance key
    ///
    /// The next cycle for that key re-initializes from defaults.
    pub fn clear(&mut self, key: &str) -> Option<WidgetState<V>> {
        self.entries.remove(key)
    }

    /// Drop every record in the session
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    /// Number of live widget records
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Commit a full record for an instance key
    pub(crate) fn commit(&mut self, key: &str, state: WidgetState<V>) {
        self.entries.insert(key.to_string(), state);
    }
}
