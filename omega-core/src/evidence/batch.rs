//! Probe results grouped per collection phase

use serde::{Deserialize, Serialize};

use crate::events::Phase;

/// Output of a single probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub field: String,
    pub output: String,
}

impl ProbeResult {
    pub fn new(field: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            output: output.into(),
        }
    }
}

/// Ordered probe results for one phase
///
/// Built once by the collector and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceBatch {
    phase: Phase,
    results: Vec<ProbeResult>,
}

impl EvidenceBatch {
    pub fn new(phase: Phase, results: Vec<ProbeResult>) -> Self {
        Self { phase, results }
    }

    /// Build a batch from `(field, output)` pairs
    pub fn from_pairs<F, O>(phase: Phase, pairs: impl IntoIterator<Item = (F, O)>) -> Self
    where
        F: Into<String>,
        O: Into<String>,
    {
        let results = pairs
            .into_iter()
            .map(|(field, output)| ProbeResult::new(field, output))
            .collect();
        Self { phase, results }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Output recorded for `field`
    pub fn get(&self, field: &str) -> Option<&str> {
        self.results
            .iter()
            .find(|r| r.field == field)
            .map(|r| r.output.as_str())
    }

    /// Field names in collection order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.field.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
