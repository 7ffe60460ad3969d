//! Searchpick - an async search-select widget core for rerun-driven hosts
//!
//! This library implements the interaction state machine behind a searchable
//! select widget: keystrokes are forwarded to a search provider, ranked
//! results are cached per widget instance, and submits/resets are reconciled
//! into a single consistent current value across host script re-executions.

use std::error::Error;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error as ThisError;

pub mod boundary;
pub mod config;
pub mod event;
pub mod host;
pub mod machine;
pub mod options;
pub mod provider;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use boundary::{PresentationBoundary, RenderRequest, ScriptedBoundary};
pub use config::{ExtraArgs, SubmitMode, WidgetConfig};
pub use event::{BoundaryEvent, Interaction, WidgetEvent};
pub use host::{CycleDriver, HostCapabilities, RerunRequest, RerunScope, RerunTrigger};
pub use machine::{CycleOutcome, SearchSelect};
pub use options::{DisplayOption, OptionInput, ResultSet};
pub use provider::{FuzzySource, SearchProvider};
pub use state::{RenderEpoch, StateStore, WidgetState};

/// Boxed error type returned by search providers
pub type ProviderError = Box<dyn Error + Send + Sync>;

/// Bounds required of caller-facing selection values
///
/// Values cross the presentation boundary as JSON, so they must be serde
/// (de)serializable; equality backs the submit-monotonicity guard.
pub trait SelectValue: Clone + PartialEq + Serialize + DeserializeOwned {}

impl<T: Clone + PartialEq + Serialize + DeserializeOwned> SelectValue for T {}

/// Error enum, contains all failure states of a widget cycle
#[derive(Debug, ThisError)]
pub enum SelectError {
    /// The search provider failed; the cycle is aborted with no state commit
    #[error("Search provider error: {0}")]
    Provider(#[source] ProviderError),
    /// An index-form submit pointed outside the cached result set
    #[error("Submitted index {index} out of range ({len} options)")]
    IndexOutOfRange { index: usize, len: usize },
    /// A submit payload could not be decoded into the caller value type
    #[error("Invalid submit payload: {0}")]
    InvalidSubmit(#[from] serde_json::Error),
    /// Dataset ingestion error
    #[error("Dataset error: {0}")]
    Dataset(#[from] csv::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Widget result type
pub type Result<T> = std::result::Result<T, SelectError>;
