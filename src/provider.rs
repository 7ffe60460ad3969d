//! Search provider contract and the bundled fuzzy provider
//!
//! The state machine never computes results itself; it calls a
//! [`SearchProvider`] with the query and the configured extra arguments.
//! Providers are synchronous and blocking from the machine's perspective.
//! `FuzzySource` is a convenience implementation backed by nucleo over a
//! small in-memory dataset, with optional CSV ingestion.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use nucleo::{
    Config, Nucleo,
    pattern::{CaseMatching, Normalization},
};
use serde::Deserialize;
use tracing::trace;

use crate::ProviderError;
use crate::config::ExtraArgs;
use crate::options::OptionInput;

/// Trait for ranked-result search providers
///
/// Returning `None` is equivalent to returning an empty sequence and is not
/// an error. Errors are not caught by the state machine; they abort the
/// cycle with no state commit.
pub trait SearchProvider<V> {
    /// Compute ranked results for a query
    ///
    /// # Errors
    ///
    /// Implementations may fail for any reason; the failure propagates to
    /// the host cycle.
    fn search(
        &mut self,
        query: &str,
        extra: &ExtraArgs,
    ) -> Result<Option<Vec<OptionInput<V>>>, ProviderError>;
}

impl<V, F> SearchProvider<V> for F
where
    F: FnMut(&str, &ExtraArgs) -> Result<Option<Vec<OptionInput<V>>>, ProviderError>,
{
    fn search(
        &mut self,
        query: &str,
        extra: &ExtraArgs,
    ) -> Result<Option<Vec<OptionInput<V>>>, ProviderError> {
        self(query, extra)
    }
}

/// One entry of an in-memory dataset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetEntry {
    /// Caller-facing value returned on submit
    pub value: String,
    /// Text the fuzzy matcher ranks against; also the display title
    pub title: String,
    /// Secondary display text
    #[serde(default)]
    pub description: Option<String>,
    /// Image reference for the boundary
    #[serde(default)]
    pub image: Option<String>,
}

/// Fuzzy search provider over a small in-memory dataset
///
/// Ranks entry titles with nucleo. Query policy (minimum length, result cap)
/// lives here, on the provider side, never in the state machine.
#[derive(Debug, Clone)]
pub struct FuzzySource {
    entries: Vec<DatasetEntry>,
    min_query_len: usize,
    limit: usize,
}

impl FuzzySource {
    /// Create a provider over the given entries
    #[must_use]
    pub fn new(entries: Vec<DatasetEntry>) -> Self {
        Self {
            entries,
            min_query_len: 0,
            limit: 10,
        }
    }

    /// Load a dataset from CSV with `value,title,description,image` columns
    ///
    /// `description` and `image` may be absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the CSV is malformed.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let entries = csv_reader
            .deserialize()
            .collect::<Result<Vec<DatasetEntry>, _>>()?;
        Ok(Self::new(entries))
    }

    /// Load a dataset from a CSV file on disk
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is malformed.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::Reader::from_path(path)?;
        let entries = csv_reader
            .deserialize()
            .collect::<Result<Vec<DatasetEntry>, _>>()?;
        Ok(Self::new(entries))
    }

    /// Require at least this many characters before searching
    #[must_use]
    pub const fn with_min_query_len(mut self, min: usize) -> Self {
        self.min_query_len = min;
        self
    }

    /// Cap the number of ranked results returned
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Number of dataset entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dataset is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank entries against the query with nucleo
    fn ranked(&self, query: &str) -> Vec<OptionInput<String>> {
        let mut nucleo: Nucleo<u32> = Nucleo::new(Config::DEFAULT, Arc::new(|| {}), None, 1);

        let injector = nucleo.injector();
        for (idx, entry) in self.entries.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let _ = injector.push(idx as u32, |_, cols| {
                cols[0] = entry.title.clone().into();
            });
        }

        nucleo
            .pattern
            .reparse(0, query, CaseMatching::Smart, Normalization::Smart, false);

        // Tick until the matcher has drained the injected items
        let mut status = nucleo.tick(100);
        while status.running {
            status = nucleo.tick(100);
        }

        let snapshot = nucleo.snapshot();
        snapshot
            .matched_items(..)
            .take(self.limit)
            .map(|item| {
                let entry = &self.entries[*item.data as usize];
                OptionInput::card(
                    entry.value.clone(),
                    entry.title.clone(),
                    entry.description.clone(),
                    entry.image.clone(),
                )
            })
            .collect()
    }
}

impl SearchProvider<String> for FuzzySource {
    fn search(
        &mut self,
        query: &str,
        _extra: &ExtraArgs,
    ) -> Result<Option<Vec<OptionInput<String>>>, ProviderError> {
        if query.trim().is_empty() || query.len() < self.min_query_len {
            trace!(query = %query, "query below provider threshold");
            return Ok(Some(Vec::new()));
        }
        Ok(Some(self.ranked(query)))
    }
}
