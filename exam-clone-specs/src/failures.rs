//! Expected failures tracking via TOML file.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::errors::{SpecError, SpecResult};

/// Loaded expected failures configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpectedFailures {
    /// Known failures (won't fix soon).
    #[serde(default)]
    pub known: Vec<FailureEntry>,
    /// Pending failures (awaiting fix).
    #[serde(default)]
    pub pending: Vec<FailureEntry>,
}

/// A single expected failure entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FailureEntry {
    /// Fixture file name.
    pub fixture: String,
    /// Expectation reference (e.g., "L12" for the expectation on line 12).
    pub expectation: String,
    #[serde(default)]
    pub reason: Option<String>,
    /// Date added (YYYY-MM-DD).
    #[serde(default)]
    pub added: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
}

/// Failure lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureState {
    /// Known limitation, won't fix soon.
    Known,
    /// Awaiting fix, not blocking.
    Pending,
    /// Expected to pass - failure is a regression.
    Regression,
}

impl ExpectedFailures {
    /// Load from a TOML file; a missing file means no expected failures.
    pub fn load(path: &Path) -> SpecResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SpecError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn is_expected(&self, fixture: &str, expectation_ref: &str) -> FailureState {
        if self.find(&self.known, fixture, expectation_ref).is_some() {
            FailureState::Known
        } else if self.find(&self.pending, fixture, expectation_ref).is_some() {
            FailureState::Pending
        } else {
            FailureState::Regression
        }
    }

    /// Format an expectation reference from its source line.
    pub fn format_ref(source_line: usize) -> String {
        format!("L{}", source_line)
    }

    pub fn count(&self) -> usize {
        self.known.len() + self.pending.len()
    }

    pub fn get_entry(&self, fixture: &str, expectation_ref: &str) -> Option<&FailureEntry> {
        self.find(&self.known, fixture, expectation_ref)
            .or_else(|| self.find(&self.pending, fixture, expectation_ref))
    }

    fn find<'a>(
        &self,
        entries: &'a [FailureEntry],
        fixture: &str,
        expectation_ref: &str,
    ) -> Option<&'a FailureEntry> {
        entries
            .iter()
            .find(|e| e.fixture == fixture && e.expectation == expectation_ref)
    }
}

/// Result of running the harness.
#[derive(Debug, Clone, Default)]
pub struct HarnessResult {
    /// Total expectations checked.
    pub total: usize,
    pub passed: usize,
    /// Expected failures (known + pending).
    pub expected_failures: usize,
    /// Regressions (unexpected failures).
    pub regressions: usize,
}

impl HarnessResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all fixtures passed (no regressions).
    pub fn success(&self) -> bool {
        self.regressions == 0
    }

    pub fn record_pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    /// Record a failed expectation with its state.
    pub fn record_failure(&mut self, state: FailureState) {
        self.total += 1;
        match state {
            FailureState::Known | FailureState::Pending => {
                self.expected_failures += 1;
            }
            FailureState::Regression => {
                self.regressions += 1;
            }
        }
    }
}
