//! The reconciliation pipeline: segment, classify, resolve, de-conflict.

use crate::config::EngineConfig;
use crate::conflict::resolve_conflicts;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Stage};
use crate::document::Document;
use crate::errors::EngineResult;
use crate::outcome::{Outcome, PositionReport, Status};
use crate::resolve::{resolve_mapping, ResolutionContext};
use crate::segment::segment;
use crate::shape::{classify, Classification};

/// Reconciles source documents against target documents.
///
/// ```
/// use exam_clone::{Engine, EngineConfig};
///
/// let engine = Engine::new(EngineConfig::standard()).unwrap();
/// let outcome = engine
///     .reconcile(
///         "1. Q(id:100)(id:101)(id:102) 2. R(id:200)(id:201)",
///         "1. Q(id:101) 2. R(id:201)",
///     )
///     .unwrap();
/// assert_eq!(outcome.mapping.get("101"), Some("100"));
/// assert_eq!(outcome.mapping.get("201"), Some("200"));
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline, collecting diagnostics into the outcome.
    pub fn reconcile(&self, target_text: &str, source_text: &str) -> EngineResult<Outcome> {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut outcome = self.reconcile_with_sink(target_text, source_text, &mut diagnostics)?;
        outcome.diagnostics = diagnostics;
        Ok(outcome)
    }

    /// Run the full pipeline, sending diagnostics to `sink`.
    ///
    /// The returned outcome carries no diagnostics of its own.
    pub fn reconcile_with_sink(
        &self,
        target_text: &str,
        source_text: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> EngineResult<Outcome> {
        let target = segment(target_text, sink)?;
        let source = segment(source_text, sink)?;
        self.reconcile_documents(&target, &source, sink)
    }

    /// Reconcile already segmented documents.
    pub fn reconcile_documents(
        &self,
        target: &Document,
        source: &Document,
        sink: &mut dyn DiagnosticSink,
    ) -> EngineResult<Outcome> {
        let classification = match self.config.shape_override {
            Some(shape) => {
                sink.debug(Stage::Classify, format!("shape forced to {}", shape));
                Classification {
                    shape,
                    diagnostic: "set by configuration".to_string(),
                    average_ids: None,
                }
            }
            None => classify(target, &self.config, sink),
        };

        let resolution = resolve_mapping(source, target, classification.shape, sink);
        let settled = resolve_conflicts(&resolution.mapping, source, target, &self.config, sink)?;

        let mut unresolved = resolution.unresolved;
        unresolved.extend(settled.unresolved);
        unresolved.sort_unstable();
        unresolved.dedup();

        let ctx = ResolutionContext::new(source, target);
        let uncovered_targets: Vec<String> = ctx
            .uncovered(settled.mapping.entries().iter().map(|e| e.target_id.as_str()))
            .into_iter()
            .map(str::to_string)
            .collect();
        if !uncovered_targets.is_empty() {
            sink.warning(
                Stage::Conflict,
                format!(
                    "{} target ids have no source question: {}",
                    uncovered_targets.len(),
                    uncovered_targets.join(", ")
                ),
            );
        }

        let positions: Vec<PositionReport> = source
            .questions()
            .iter()
            .map(|question| {
                let matched = resolution
                    .correct
                    .contains(&question.position)
                    .then(|| target.position_of(&question.primary_id))
                    .flatten();
                let status = if let Some(target_position) = matched {
                    Status::Correct { target_position }
                } else if let Some(entry) = settled.mapping.entry_at(question.position) {
                    Status::Change {
                        to: entry.target_id.clone(),
                    }
                } else {
                    Status::Unresolved
                };
                PositionReport {
                    position: question.position,
                    current_id: question.primary_id.clone(),
                    status,
                }
            })
            .collect();

        let changed = settled.mapping.entries().iter().map(|e| e.position).collect();

        sink.debug(
            Stage::Conflict,
            format!(
                "settled after {} passes: {}",
                settled.passes, settled.mapping
            ),
        );

        Ok(Outcome {
            classification,
            mapping: settled.mapping,
            positions,
            correct: resolution.correct,
            changed,
            unresolved,
            uncovered_targets,
            diagnostics: Vec::new(),
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: EngineConfig::standard(),
        }
    }
}
