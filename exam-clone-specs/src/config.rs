//! Harness configuration.

use exam_clone::EngineConfig;

use crate::errors::{SpecError, SpecResult};
use crate::fixture::ExamFixture;

/// Engine settings shared by every fixture in a run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// TOML lines applied before each fixture's own `set` lines.
    pub settings: Vec<String>,
}

impl HarnessConfig {
    /// Standard engine configuration, fixture overrides only.
    pub fn standard() -> Self {
        Self {
            settings: Vec::new(),
        }
    }

    /// Create with shared settings.
    pub fn with_settings(settings: Vec<String>) -> Self {
        Self { settings }
    }

    /// Engine configuration for one fixture.
    ///
    /// A key set both here and in the fixture is a TOML duplicate and is rejected.
    pub fn engine_config(&self, fixture: &ExamFixture) -> SpecResult<EngineConfig> {
        let toml = self
            .settings
            .iter()
            .chain(&fixture.settings)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        EngineConfig::from_toml_str(&toml).map_err(SpecError::Config)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::standard()
    }
}
