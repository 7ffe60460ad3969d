//! Widget instance configuration
//!
//! One `WidgetConfig` per widget instance, built with chained `with_*`
//! methods. The core assumes well-typed configuration and performs no
//! defensive validation beyond the transition-table guards.

use std::fmt;
use std::time::Duration;

use crate::host::RerunScope;
use crate::options::OptionInput;

/// Structured extra arguments forwarded to the search provider
///
/// Replaces ad hoc keyword spreading with a fixed shape defined by
/// configuration.
pub type ExtraArgs = serde_json::Map<String, serde_json::Value>;

/// How submit payloads are resolved into caller values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitMode {
    /// Integer payloads index into the cached caller representation
    #[default]
    IndexResolved,
    /// Payloads are deserialized into the caller value type directly
    PassThrough,
}

/// Callback invoked when a submit commits a new value
pub type OnSubmit<V> = Box<dyn FnMut(&V)>;

/// Callback invoked when the widget is reset
pub type OnReset = Box<dyn FnMut()>;

/// Configuration for one widget instance
pub struct WidgetConfig<V> {
    /// Request a host rerun after search and reset transitions
    pub rerun_on_update: bool,
    /// Preferred rerun scope; narrowed only when the host supports it
    pub rerun_scope: RerunScope,
    /// Minimum visible latency for a search cycle before a rerun is requested
    pub min_execution_time: Duration,
    /// Clear the search surface back to defaults after a submit
    pub clear_on_submit: bool,
    /// Treat a completed search as an implicit submit of its own value
    pub submit_after_search: bool,
    /// Submit payload resolution mode
    pub submit_mode: SubmitMode,
    /// Search term the widget returns to on reset
    pub default_searchterm: String,
    /// Options shown before the first search
    pub default_options: Vec<OptionInput<V>>,
    /// Value reported before the first submit and after reset
    pub default_value: Option<V>,
    /// Structured passthrough handed to the provider on every invocation
    pub extra_args: ExtraArgs,
    /// Invoked when a submit commits a value different from the current one
    pub on_submit: Option<OnSubmit<V>>,
    /// Invoked when the widget is reset
    pub on_reset: Option<OnReset>,
}

impl<V> Default for WidgetConfig<V> {
    fn default() -> Self {
        Self {
            rerun_on_update: true,
            rerun_scope: RerunScope::Full,
            min_execution_time: Duration::ZERO,
            clear_on_submit: false,
            submit_after_search: false,
            submit_mode: SubmitMode::default(),
            default_searchterm: String::new(),
            default_options: Vec::new(),
            default_value: None,
            extra_args: ExtraArgs::new(),
            on_submit: None,
            on_reset: None,
        }
    }
}

impl<V> WidgetConfig<V> {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether search/reset transitions request a rerun
    #[must_use]
    pub const fn with_rerun_on_update(mut self, rerun: bool) -> Self {
        self.rerun_on_update = rerun;
        self
    }

    /// Set the preferred rerun scope
    #[must_use]
    pub const fn with_rerun_scope(mut self, scope: RerunScope) -> Self {
        self.rerun_scope = scope;
        self
    }

    /// Set the minimum visible latency for search cycles
    #[must_use]
    pub const fn with_min_execution_time(mut self, floor: Duration) -> Self {
        self.min_execution_time = floor;
        self
    }

    /// Clear the search surface after each submit
    #[must_use]
    pub const fn with_clear_on_submit(mut self, clear: bool) -> Self {
        self.clear_on_submit = clear;
        self
    }

    /// Treat a completed search as an implicit submit on the next cycle
    #[must_use]
    pub const fn with_submit_after_search(mut self, submit: bool) -> Self {
        self.submit_after_search = submit;
        self
    }

    /// Set the submit payload resolution mode
    #[must_use]
    pub const fn with_submit_mode(mut self, mode: SubmitMode) -> Self {
        self.submit_mode = mode;
        self
    }

    /// Set the search term restored on reset
    #[must_use]
    pub fn with_default_searchterm(mut self, term: impl Into<String>) -> Self {
        self.default_searchterm = term.into();
        self
    }

    /// Set the options shown before the first search
    #[must_use]
    pub fn with_default_options(mut self, options: Vec<OptionInput<V>>) -> Self {
        self.default_options = options;
        self
    }

    /// Set the value reported before the first submit
    #[must_use]
    pub fn with_default_value(mut self, value: V) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Set the structured provider passthrough
    #[must_use]
    pub fn with_extra_args(mut self, extra: ExtraArgs) -> Self {
        self.extra_args = extra;
        self
    }

    /// Set the submit callback
    #[must_use]
    pub fn with_on_submit(mut self, callback: impl FnMut(&V) + 'static) -> Self {
        self.on_submit = Some(Box::new(callback));
        self
    }

    /// Set the reset callback
    #[must_use]
    pub fn with_on_reset(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_reset = Some(Box::new(callback));
        self
    }
}

impl<V: fmt::Debug> fmt::Debug for WidgetConfig<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("rerun_on_update", &self.rerun_on_update)
            .field("rerun_scope", &self.rerun_scope)
            .field("min_execution_time", &self.min_execution_time)
            .field("clear_on_submit", &self.clear_on_submit)
            .field("submit_after_search", &self.submit_after_search)
            .field("submit_mode", &self.submit_mode)
            .field("default_searchterm", &self.default_searchterm)
            .field("default_value", &self.default_value)
            .field("extra_args", &self.extra_args)
            .field("on_submit", &self.on_submit.as_ref().map(|_| ".."))
            .field("on_reset", &self.on_reset.as_ref().map(|_| ".."))
            .finish()
    }
}
