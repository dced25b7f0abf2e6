use crate::diagnostics::{DiagnosticSink, Stage};
use crate::mapping::MappingEntry;

use super::{Assigned, PendingQuestion, ResolutionContext, ResolveStrategy};

/// First candidate in appearance order wins.
///
/// Two questions may claim the same target here; conflict resolution
/// restores injectivity afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectMatch;

impl ResolveStrategy for DirectMatch {
    fn name(&self) -> &'static str {
        "direct alternative matching"
    }

    fn assign<'a>(
        &self,
        ctx: &ResolutionContext<'a>,
        pending: Vec<PendingQuestion<'a>>,
        sink: &mut dyn DiagnosticSink,
    ) -> Assigned {
        let mut assigned = Assigned::default();
        for question in pending {
            let Some(&chosen) = question.options.first() else {
                assigned.unresolved.push(question.position);
                continue;
            };
            if ctx.is_duplicate_target(chosen) {
                sink.warning(
                    Stage::Resolve,
                    format!(
                        "Q{}: candidate {} is a duplicate target main id",
                        question.position, chosen
                    ),
                );
            }
            sink.debug(
                Stage::Resolve,
                format!("Q{}: {} -> {}", question.position, question.source_id, chosen),
            );
            assigned.mapping.insert(MappingEntry {
                position: question.position,
                source_id: question.source_id.to_string(),
                target_id: chosen.to_string(),
            });
        }
        assigned
    }
}
