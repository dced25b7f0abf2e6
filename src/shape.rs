//! Structural shape of a document.
//!
//! A document whose questions carry several ids each is "rich": its
//! alternatives are meaningful and can be matched directly. A document with
//! roughly one id per question is "poor" and needs globally consistent
//! scheduling instead.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::EngineConfig;
use crate::diagnostics::{DiagnosticSink, Stage};
use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rich,
    Poor,
    /// Too little structure to decide.
    Unknown,
}

impl Shape {
    /// The strategy shape; an undecided document resolves as poor.
    pub fn effective(self) -> Shape {
        match self {
            Shape::Unknown => Shape::Poor,
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Rich => "rich",
            Shape::Poor => "poor",
            Shape::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shape verdict and a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub shape: Shape,
    pub diagnostic: String,
    /// Average ids per sampled question, when structure was inspected.
    pub average_ids: Option<f64>,
}

/// Classify a document by its average alternative density.
pub fn classify(
    document: &Document,
    config: &EngineConfig,
    sink: &mut dyn DiagnosticSink,
) -> Classification {
    let count = document.len();

    let classification = if count < config.min_structured_questions {
        let distinct = document.distinct_id_count();
        if distinct >= config.degenerate_marker_floor {
            Classification {
                shape: Shape::Poor,
                diagnostic: format!(
                    "only {} numbered questions but {} distinct ids; treating as single-id document",
                    count, distinct
                ),
                average_ids: None,
            }
        } else {
            Classification {
                shape: Shape::Unknown,
                diagnostic: format!(
                    "not enough numbered questions found ({}); need at least {}",
                    count, config.min_structured_questions
                ),
                average_ids: None,
            }
        }
    } else {
        let sample = &document.questions()[..count.min(config.sample_size)];
        let total: usize = sample.iter().map(|q| q.alternative_ids.len()).sum();
        let average = total as f64 / sample.len() as f64;

        if average > config.rich_threshold {
            Classification {
                shape: Shape::Rich,
                diagnostic: format!(
                    "{} questions (avg {:.1} ids/question - has alternatives)",
                    count, average
                ),
                average_ids: Some(average),
            }
        } else {
            Classification {
                shape: Shape::Poor,
                diagnostic: format!(
                    "{} questions (avg {:.1} ids/question - single ids)",
                    count, average
                ),
                average_ids: Some(average),
            }
        }
    };

    sink.debug(
        Stage::Classify,
        format!("{}: {}", classification.shape, classification.diagnostic),
    );
    classification
}
