//! Shared test fixtures

use crate::ProviderError;
use crate::config::ExtraArgs;
use crate::options::OptionInput;
use crate::provider::SearchProvider;

/// Provider test double with canned results and call accounting
pub struct CountingProvider<V = String> {
    canned: Vec<OptionInput<V>>,
    calls: usize,
    fail_next: bool,
    return_none: bool,
}

impl<V: Clone> CountingProvider<V> {
    /// Provider that always returns the given entries
    pub fn new(canned: Vec<OptionInput<V>>) -> Self {
        Self {
            canned,
            calls: 0,
            fail_next: false,
            return_none: false,
        }
    }

    /// Provider that returns `None` instead of a result sequence
    pub fn returning_none() -> Self {
        Self {
            canned: Vec::new(),
            calls: 0,
            fail_next: false,
            return_none: true,
        }
    }

    /// Fail the next invocation with a provider error
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    /// Number of provider invocations so far
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl<V: Clone> SearchProvider<V> for CountingProvider<V> {
    fn search(
        &mut self,
        _query: &str,
        _extra: &ExtraArgs,
    ) -> Result<Option<Vec<OptionInput<V>>>, ProviderError> {
        self.calls += 1;
        if self.fail_next {
            self.fail_next = false;
            return Err("provider exploded".into());
        }
        if self.return_none {
            return Ok(None);
        }
        Ok(Some(self.canned.clone()))
    }
}

/// Three-entry result fixture mixing cards and plain values
pub fn card_results() -> Vec<OptionInput<String>> {
    vec![
        OptionInput::card(
            "us".to_string(),
            "United States",
            Some("country".into()),
            Some("us.png".into()),
        ),
        OptionInput::card("fr".to_string(), "France", None, None),
        OptionInput::Plain("de".to_string()),
    ]
}
