//! Tentative identifier mapping from a source document onto a target.
//!
//! Questions whose primary id is already a target main need nothing. Every
//! other question gets a candidate list (see [`ResolutionContext::candidates`])
//! and a [`ResolveStrategy`] picks from those lists:
//!
//! - [`DirectMatch`] for rich documents: first candidate wins, conflicts are
//!   left to [`resolve_conflicts`](crate::resolve_conflicts).
//! - [`MostConstrainedFirst`] for poor documents: a global schedule that
//!   never assigns one target twice.

mod candidates;
mod direct;
mod scheduled;

pub use candidates::ResolutionContext;
pub use direct::DirectMatch;
pub use scheduled::{MostConstrainedFirst, Schedule};

use std::collections::HashMap;

use crate::diagnostics::{DiagnosticSink, Stage};
use crate::document::Document;
use crate::mapping::Mapping;
use crate::shape::Shape;

/// A question that needs a new id, with its surviving candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion<'a> {
    pub position: usize,
    pub source_id: &'a str,
    pub options: Vec<&'a str>,
}

/// What a strategy produced from the pending questions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assigned {
    pub mapping: Mapping,
    pub unresolved: Vec<usize>,
}

/// Picks target ids for pending questions.
pub trait ResolveStrategy {
    fn name(&self) -> &'static str;

    fn assign<'a>(
        &self,
        ctx: &ResolutionContext<'a>,
        pending: Vec<PendingQuestion<'a>>,
        sink: &mut dyn DiagnosticSink,
    ) -> Assigned;
}

/// The tentative mapping plus the position partitions known so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub mapping: Mapping,
    /// Positions whose primary id is already a target main.
    pub correct: Vec<usize>,
    /// Positions without any valid candidate, ascending.
    pub unresolved: Vec<usize>,
}

/// The strategy a shape resolves with.
pub fn strategy_for(shape: Shape) -> Box<dyn ResolveStrategy> {
    match shape.effective() {
        Shape::Rich => Box::new(DirectMatch),
        _ => Box::new(MostConstrainedFirst),
    }
}

/// Map every source question that is not already correct onto a target main.
pub fn resolve_mapping(
    source: &Document,
    target: &Document,
    shape: Shape,
    sink: &mut dyn DiagnosticSink,
) -> Resolution {
    let ctx = ResolutionContext::new(source, target);
    let strategy = strategy_for(shape);
    sink.debug(
        Stage::Resolve,
        format!("resolving {} as {} with {}", source.len(), shape, strategy.name()),
    );

    for (id, positions) in target.duplicate_main_ids() {
        sink.warning(
            Stage::Resolve,
            format!("duplicate target main id {} at positions {:?}", id, positions),
        );
    }
    for (id, positions) in source.duplicate_main_ids() {
        sink.warning(
            Stage::Resolve,
            format!("duplicate source main id {} at positions {:?}", id, positions),
        );
    }

    let mut correct = Vec::new();
    let mut unresolved = Vec::new();
    let mut pending = Vec::new();
    // Source id -> the position already queued to change it.
    let mut queued: HashMap<&str, usize> = HashMap::new();

    for question in source.questions() {
        if ctx.is_correct(question) {
            sink.debug(
                Stage::Resolve,
                format!(
                    "Q{}: id {} already matches target",
                    question.position, question.primary_id
                ),
            );
            correct.push(question.position);
            continue;
        }

        if let Some(earlier) = queued.get(question.primary_id.as_str()) {
            sink.warning(
                Stage::Resolve,
                format!(
                    "Q{}: id {} is already being changed at Q{}",
                    question.position, question.primary_id, earlier
                ),
            );
            unresolved.push(question.position);
            continue;
        }

        let options = ctx.candidates(question);
        if options.is_empty() {
            sink.debug(
                Stage::Resolve,
                format!(
                    "Q{}: id {} needs a change but has no valid alternatives",
                    question.position, question.primary_id
                ),
            );
            unresolved.push(question.position);
            continue;
        }

        sink.debug(
            Stage::Resolve,
            format!(
                "Q{}: id {} needs a change, options {:?}",
                question.position, question.primary_id, options
            ),
        );
        queued.insert(question.primary_id.as_str(), question.position);
        pending.push(PendingQuestion {
            position: question.position,
            source_id: question.primary_id.as_str(),
            options,
        });
    }

    let assigned = strategy.assign(&ctx, pending, sink);
    unresolved.extend(assigned.unresolved);
    unresolved.sort_unstable();

    Resolution {
        mapping: assigned.mapping,
        correct,
        unresolved,
    }
}
