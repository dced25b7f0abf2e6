use std::collections::BTreeSet;

use crate::diagnostics::{DiagnosticSink, Stage};
use crate::mapping::{Mapping, MappingEntry};

use super::{Assigned, PendingQuestion, ResolutionContext, ResolveStrategy};

/// Greedy global assignment: the question with the fewest remaining
/// options is served first, ties by position.
#[derive(Debug, Clone, Copy, Default)]
pub struct MostConstrainedFirst;

/// Immutable snapshot of the schedule between two steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule<'a> {
    pub mapping: Mapping,
    pub used: BTreeSet<&'a str>,
    pub pending: Vec<PendingQuestion<'a>>,
    pub unresolved: Vec<usize>,
}

impl<'a> Schedule<'a> {
    pub fn new(pending: Vec<PendingQuestion<'a>>) -> Self {
        Self {
            mapping: Mapping::new(),
            used: BTreeSet::new(),
            pending,
            unresolved: Vec::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    /// Options of a pending question not yet taken.
    fn available(&self, question: &PendingQuestion<'a>) -> Vec<&'a str> {
        question
            .options
            .iter()
            .copied()
            .filter(|id| !self.used.contains(id))
            .collect()
    }

    /// One step: drop exhausted questions, then assign the most constrained one.
    ///
    /// Every step that is not done removes at least one pending question.
    pub fn advance(&self, sink: &mut dyn DiagnosticSink) -> Schedule<'a> {
        let mut next = self.clone();
        let mut live = Vec::with_capacity(next.pending.len());

        for question in next.pending.drain(..) {
            let available = self.available(&question);
            if available.is_empty() {
                sink.debug(
                    Stage::Schedule,
                    format!("Q{}: ran out of options", question.position),
                );
                next.unresolved.push(question.position);
            } else {
                live.push((available, question));
            }
        }

        let chosen = live
            .iter()
            .enumerate()
            .min_by_key(|(_, (available, question))| (available.len(), question.position))
            .map(|(idx, _)| idx);

        if let Some(idx) = chosen {
            let (available, question) = live.remove(idx);
            let target = available[0];
            sink.debug(
                Stage::Schedule,
                format!(
                    "Q{}: {} -> {} (had {} options)",
                    question.position,
                    question.source_id,
                    target,
                    available.len()
                ),
            );
            next.used.insert(target);
            next.mapping.insert(MappingEntry {
                position: question.position,
                source_id: question.source_id.to_string(),
                target_id: target.to_string(),
            });
        }

        next.pending = live.into_iter().map(|(_, question)| question).collect();
        next
    }

    /// Run steps until nothing is pending.
    pub fn run(self, sink: &mut dyn DiagnosticSink) -> Schedule<'a> {
        let mut schedule = self;
        while !schedule.is_done() {
            schedule = schedule.advance(sink);
        }
        schedule.unresolved.sort_unstable();
        schedule
    }
}

impl ResolveStrategy for MostConstrainedFirst {
    fn name(&self) -> &'static str {
        "most-constrained-first scheduling"
    }

    fn assign<'a>(
        &self,
        ctx: &ResolutionContext<'a>,
        pending: Vec<PendingQuestion<'a>>,
        sink: &mut dyn DiagnosticSink,
    ) -> Assigned {
        sink.debug(
            Stage::Schedule,
            format!("{} questions need changes", pending.len()),
        );
        let schedule = Schedule::new(pending).run(sink);

        for id in schedule.mapping.entries().iter().map(|e| e.target_id.as_str()) {
            if ctx.is_duplicate_target(id) {
                sink.warning(
                    Stage::Schedule,
                    format!("assigned {} is a duplicate target main id", id),
                );
            }
        }

        Assigned {
            mapping: schedule.mapping,
            unresolved: schedule.unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;

    fn pending(position: usize, source_id: &'static str, options: &[&'static str]) -> PendingQuestion<'static> {
        PendingQuestion {
            position,
            source_id,
            options: options.to_vec(),
        }
    }

    #[test]
    fn test_steps_are_snapshots() {
        let start = Schedule::new(vec![
            pending(1, "a", &["x", "y"]),
            pending(2, "b", &["x"]),
        ]);
        let step = start.advance(&mut NullSink);

        // The starting snapshot is untouched.
        assert_eq!(start.pending.len(), 2);
        assert!(start.mapping.is_empty());

        assert_eq!(step.pending.len(), 1);
        assert_eq!(step.mapping.pairs(), vec![("b", "x")]);
        assert!(step.used.contains("x"));
    }

    #[test]
    fn test_reorders_after_each_assignment() {
        // Q1 {a}, Q2 {b, c}, Q3 {a, b}: after Q1 takes a, Q3 is down to {b}
        // and must go before Q2.
        let schedule = Schedule::new(vec![
            pending(1, "s1", &["a"]),
            pending(2, "s2", &["b", "c"]),
            pending(3, "s3", &["a", "b"]),
        ])
        .run(&mut NullSink);

        assert_eq!(
            schedule.mapping.pairs(),
            vec![("s1", "a"), ("s2", "c"), ("s3", "b")]
        );
        assert!(schedule.unresolved.is_empty());
    }

    #[test]
    fn test_exhausted_questions_become_unresolved() {
        let schedule = Schedule::new(vec![
            pending(1, "s1", &["a"]),
            pending(2, "s2", &["a"]),
            pending(3, "s3", &["a", "b"]),
        ])
        .run(&mut NullSink);

        assert_eq!(schedule.mapping.pairs(), vec![("s1", "a"), ("s3", "b")]);
        assert_eq!(schedule.unresolved, vec![2]);
        assert!(schedule.mapping.is_injective());
    }
}
