//! Engine configuration.

use serde::Deserialize;

use crate::errors::{EngineError, EngineResult};
use crate::shape::Shape;
use crate::tie_break::TieBreak;

/// Tunable parameters for classification and resolution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Conflict-resolution passes before giving up.
    pub max_passes: usize,
    /// Average ids per question above which a document is rich.
    pub rich_threshold: f64,
    /// Leading questions averaged by the classifier.
    pub sample_size: usize,
    /// Below this many questions the classifier ignores structure.
    pub min_structured_questions: usize,
    /// Distinct id markers that make a structure-less document poor.
    pub degenerate_marker_floor: usize,
    /// Winner selection for conflicts.
    pub tie_break: TieBreak,
    /// Skip classification and use this shape.
    pub shape_override: Option<Shape>,
}

impl EngineConfig {
    pub const DEFAULT_MAX_PASSES: usize = 20;

    /// The standard configuration.
    pub fn standard() -> Self {
        Self {
            max_passes: Self::DEFAULT_MAX_PASSES,
            rich_threshold: 2.0,
            sample_size: 5,
            min_structured_questions: 5,
            degenerate_marker_floor: 10,
            tie_break: TieBreak::EarlierPosition,
            shape_override: None,
        }
    }

    /// Parse from TOML; missing keys keep their standard values.
    pub fn from_toml_str(input: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| EngineError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape_override = Some(shape);
        self
    }

    /// Reject values the classifier cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.sample_size == 0 {
            return Err(EngineError::Config {
                message: "sample_size must be at least 1".to_string(),
            });
        }
        if self.min_structured_questions == 0 {
            return Err(EngineError::Config {
                message: "min_structured_questions must be at least 1".to_string(),
            });
        }
        if !self.rich_threshold.is_finite() {
            return Err(EngineError::Config {
                message: format!("rich_threshold must be finite, got {}", self.rich_threshold),
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_standard() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::standard());
        assert_eq!(config.max_passes, 20);
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
max_passes = 3
shape_override = "poor"

[tie_break]
policy = "pinned"
source_ids = ["151", "150"]
"#,
        )
        .unwrap();
        assert_eq!(config.max_passes, 3);
        assert_eq!(config.shape_override, Some(Shape::Poor));
        assert_eq!(
            config.tie_break,
            TieBreak::Pinned {
                source_ids: vec!["151".to_string(), "150".to_string()]
            }
        );
        assert_eq!(config.sample_size, 5);
    }

    #[test]
    fn test_later_position_policy() {
        let config = EngineConfig::from_toml_str(
            r#"
[tie_break]
policy = "later_position"
"#,
        )
        .unwrap();
        assert_eq!(config.tie_break, TieBreak::LaterPosition);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_toml_str("sample_size = 0").unwrap_err();
        assert!(matches!(err, EngineError::Config { .. }));

        let err = EngineConfig::from_toml_str("unknown_key = 1").unwrap_err();
        assert!(matches!(err, EngineError::Config { .. }));
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::standard()
            .with_max_passes(0)
            .with_tie_break(TieBreak::LaterPosition)
            .with_shape(Shape::Rich);
        assert_eq!(config.max_passes, 0);
        assert_eq!(config.tie_break, TieBreak::LaterPosition);
        assert_eq!(config.shape_override, Some(Shape::Rich));
        assert!(config.validate().is_ok());
    }
}
