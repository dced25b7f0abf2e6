//! Conflict resolution: makes a tentative mapping injective.
//!
//! The resolver is a small state machine over immutable [`Assignment`]
//! snapshots:
//!
//! ```text
//! Pending -> Scheduling { pass } -> Resolved
//!                 |  ^          \-> Failed
//!                 \--/ (one pass per step, at most `max_passes`)
//! ```
//!
//! A pass groups entries by target id, keeps the competitor the
//! [`TieBreak`](crate::TieBreak) ranks first and moves every other competitor
//! to its first candidate nobody else holds. A competitor with no such
//! candidate leaves the mapping and is reported as unresolved.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::diagnostics::{DiagnosticSink, Stage};
use crate::document::Document;
use crate::errors::{EngineError, EngineResult};
use crate::mapping::Mapping;
use crate::resolve::ResolutionContext;
use crate::tie_break::Competitor;

/// Several source questions claiming one target id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub target_id: String,
    /// Competing source ids, in source position order.
    pub competitors: Vec<String>,
    /// Positions of the competitors, parallel to `competitors`.
    pub positions: Vec<usize>,
}

impl Conflict {
    fn ranked(&self, resolver: &ConflictResolver<'_>) -> Vec<Competitor<'_>> {
        let mut ranked: Vec<Competitor<'_>> = self
            .positions
            .iter()
            .zip(&self.competitors)
            .map(|(&position, source_id)| Competitor {
                position,
                source_id: source_id.as_str(),
            })
            .collect();
        resolver.config.tie_break.order(&mut ranked);
        ranked
    }
}

/// Group mapping entries by target id; every group with two or more members.
pub fn detect_conflicts(mapping: &Mapping) -> Vec<Conflict> {
    mapping
        .duplicate_targets()
        .into_iter()
        .map(|(target_id, positions)| Conflict {
            target_id: target_id.to_string(),
            competitors: positions
                .iter()
                .filter_map(|&p| mapping.entry_at(p).map(|e| e.source_id.clone()))
                .collect(),
            positions,
        })
        .collect()
}

/// Mapping plus the positions dropped from it so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    pub mapping: Mapping,
    pub unresolved: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictState {
    Pending(Assignment),
    Scheduling { pass: usize, assignment: Assignment },
    Resolved { passes: usize, assignment: Assignment },
    Failed { unresolved: Vec<usize> },
}

impl ConflictState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConflictState::Resolved { .. } | ConflictState::Failed { .. })
    }
}

/// Result of a successful conflict resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictOutcome {
    /// Injective mapping.
    pub mapping: Mapping,
    /// Positions that lost a conflict without a replacement, ascending.
    pub unresolved: Vec<usize>,
    /// Passes it took to converge.
    pub passes: usize,
}

pub struct ConflictResolver<'a> {
    ctx: ResolutionContext<'a>,
    config: &'a EngineConfig,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(source: &'a Document, target: &'a Document, config: &'a EngineConfig) -> Self {
        Self {
            ctx: ResolutionContext::new(source, target),
            config,
        }
    }

    /// Advance the state machine by one transition.
    pub fn step(&self, state: ConflictState, sink: &mut dyn DiagnosticSink) -> ConflictState {
        match state {
            ConflictState::Pending(assignment) => ConflictState::Scheduling {
                pass: 0,
                assignment,
            },
            ConflictState::Scheduling { pass, assignment } => {
                let conflicts = detect_conflicts(&assignment.mapping);
                if conflicts.is_empty() {
                    return ConflictState::Resolved {
                        passes: pass,
                        assignment,
                    };
                }
                if pass >= self.config.max_passes {
                    sink.warning(
                        Stage::Conflict,
                        format!(
                            "{} conflicts left after {} passes",
                            conflicts.len(),
                            pass
                        ),
                    );
                    return ConflictState::Failed {
                        unresolved: self.losers(&assignment, &conflicts),
                    };
                }
                sink.debug(
                    Stage::Conflict,
                    format!("pass {}: {} conflicted target ids", pass + 1, conflicts.len()),
                );
                ConflictState::Scheduling {
                    pass: pass + 1,
                    assignment: self.run_pass(&assignment, &conflicts, sink),
                }
            }
            terminal => terminal,
        }
    }

    /// Drive the state machine to a terminal state and check the result.
    pub fn resolve(
        &self,
        mapping: &Mapping,
        sink: &mut dyn DiagnosticSink,
    ) -> EngineResult<ConflictOutcome> {
        let mut state = ConflictState::Pending(Assignment {
            mapping: mapping.clone(),
            unresolved: Vec::new(),
        });
        loop {
            state = match self.step(state, sink) {
                ConflictState::Resolved { passes, assignment } => {
                    return Self::verified(passes, assignment)
                }
                ConflictState::Failed { unresolved } => {
                    return Err(EngineError::Conflict { unresolved })
                }
                running => running,
            };
        }
    }

    /// Re-check injectivity regardless of how the assignment was reached.
    fn verified(passes: usize, mut assignment: Assignment) -> EngineResult<ConflictOutcome> {
        if let Some((target_id, positions)) =
            assignment.mapping.duplicate_targets().into_iter().next()
        {
            return Err(EngineError::InvalidAssignment {
                target_id: target_id.to_string(),
                positions,
            });
        }
        assignment.unresolved.sort_unstable();
        Ok(ConflictOutcome {
            mapping: assignment.mapping,
            unresolved: assignment.unresolved,
            passes,
        })
    }

    fn run_pass(
        &self,
        assignment: &Assignment,
        conflicts: &[Conflict],
        sink: &mut dyn DiagnosticSink,
    ) -> Assignment {
        let mut next = assignment.clone();

        for conflict in conflicts {
            let ranked = conflict.ranked(self);
            let Some((winner, losers)) = ranked.split_first() else {
                continue;
            };
            sink.debug(
                Stage::Conflict,
                format!(
                    "target {} claimed by {:?}; Q{} keeps it",
                    conflict.target_id, conflict.competitors, winner.position
                ),
            );

            for loser in losers {
                let replacement = self.replacement_for(&next.mapping, loser.position);
                match replacement {
                    Some(target_id) => {
                        sink.debug(
                            Stage::Conflict,
                            format!(
                                "Q{}: reassigned {} from {} to {}",
                                loser.position, loser.source_id, conflict.target_id, target_id
                            ),
                        );
                        next.mapping.retarget(loser.position, &target_id);
                    }
                    None => {
                        sink.debug(
                            Stage::Conflict,
                            format!(
                                "Q{}: no alternative left for {}",
                                loser.position, loser.source_id
                            ),
                        );
                        next.mapping.remove(loser.position);
                        next.unresolved.push(loser.position);
                    }
                }
            }
        }

        next
    }

    /// First candidate of the question at `position` that no other entry holds.
    fn replacement_for(&self, mapping: &Mapping, position: usize) -> Option<String> {
        let question = self.ctx.source.question_at(position)?;
        let forbidden: HashSet<&str> = mapping
            .entries()
            .iter()
            .filter(|e| e.position != position)
            .map(|e| e.target_id.as_str())
            .collect();
        self.ctx
            .candidates(question)
            .into_iter()
            .find(|candidate| !forbidden.contains(candidate))
            .map(str::to_string)
    }

    /// Everyone who would not keep their target, plus earlier drop-outs.
    fn losers(&self, assignment: &Assignment, conflicts: &[Conflict]) -> Vec<usize> {
        let mut unresolved = assignment.unresolved.clone();
        for conflict in conflicts {
            unresolved.extend(conflict.ranked(self).iter().skip(1).map(|c| c.position));
        }
        unresolved.sort_unstable();
        unresolved.dedup();
        unresolved
    }
}

/// Make `mapping` injective, reassigning or dropping conflict losers.
pub fn resolve_conflicts(
    mapping: &Mapping,
    source: &Document,
    target: &Document,
    config: &EngineConfig,
    sink: &mut dyn DiagnosticSink,
) -> EngineResult<ConflictOutcome> {
    ConflictResolver::new(source, target, config).resolve(mapping, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::mapping::MappingEntry;
    use crate::segment::segment;
    use crate::tie_break::TieBreak;

    fn entry(position: usize, source: &str, target: &str) -> MappingEntry {
        MappingEntry {
            position,
            source_id: source.to_string(),
            target_id: target.to_string(),
        }
    }

    fn docs(target: &str, source: &str) -> (Document, Document) {
        (
            segment(source, &mut NullSink).unwrap(),
            segment(target, &mut NullSink).unwrap(),
        )
    }

    #[test]
    fn test_detect_conflicts() {
        let mapping = Mapping::from_entries(vec![
            entry(1, "150", "100"),
            entry(2, "151", "100"),
            entry(3, "152", "300"),
        ]);
        let conflicts = detect_conflicts(&mapping);
        assert_eq!(
            conflicts,
            vec![Conflict {
                target_id: "100".to_string(),
                competitors: vec!["150".to_string(), "151".to_string()],
                positions: vec![1, 2],
            }]
        );
    }

    #[test]
    fn test_loser_without_alternative_is_unresolved() {
        let (source, target) = docs(
            "1. A(id:100) 2. B(id:200)",
            "1. A(id:150)(id:100)(id:200) 2. B(id:151)(id:100)",
        );
        let naive = Mapping::from_entries(vec![entry(1, "150", "100"), entry(2, "151", "100")]);
        let outcome = resolve_conflicts(
            &naive,
            &source,
            &target,
            &EngineConfig::standard(),
            &mut NullSink,
        )
        .unwrap();

        assert_eq!(outcome.mapping.pairs(), vec![("150", "100")]);
        assert_eq!(outcome.unresolved, vec![2]);
        assert_eq!(outcome.passes, 1);
    }

    #[test]
    fn test_loser_moves_to_free_alternative() {
        let (source, target) = docs(
            "1. A(id:100) 2. B(id:200)",
            "1. A(id:150)(id:100) 2. B(id:151)(id:100)(id:200)",
        );
        let naive = Mapping::from_entries(vec![entry(1, "150", "100"), entry(2, "151", "100")]);
        let outcome = resolve_conflicts(
            &naive,
            &source,
            &target,
            &EngineConfig::standard(),
            &mut NullSink,
        )
        .unwrap();

        assert_eq!(outcome.mapping.pairs(), vec![("150", "100"), ("151", "200")]);
        assert!(outcome.unresolved.is_empty());
    }

    #[test]
    fn test_tie_break_policy_picks_winner() {
        let (source, target) = docs(
            "1. A(id:100) 2. B(id:200)",
            "1. A(id:150)(id:100)(id:200) 2. B(id:151)(id:100)",
        );
        let naive = Mapping::from_entries(vec![entry(1, "150", "100"), entry(2, "151", "100")]);
        let config = EngineConfig::standard().with_tie_break(TieBreak::LaterPosition);
        let outcome = resolve_conflicts(&naive, &source, &target, &config, &mut NullSink).unwrap();

        assert_eq!(outcome.mapping.pairs(), vec![("150", "200"), ("151", "100")]);
        assert!(outcome.unresolved.is_empty());
    }

    #[test]
    fn test_pass_cap_surfaces_conflict_error() {
        let (source, target) = docs(
            "1. A(id:100) 2. B(id:200)",
            "1. A(id:150)(id:100)(id:200) 2. B(id:151)(id:100)",
        );
        let naive = Mapping::from_entries(vec![entry(1, "150", "100"), entry(2, "151", "100")]);
        let config = EngineConfig::standard().with_max_passes(0);
        let err = resolve_conflicts(&naive, &source, &target, &config, &mut NullSink).unwrap_err();

        assert_eq!(err, EngineError::Conflict { unresolved: vec![2] });
    }

    #[test]
    fn test_state_transitions() {
        let (source, target) = docs(
            "1. A(id:100) 2. B(id:200)",
            "1. A(id:150)(id:100) 2. B(id:151)(id:100)(id:200)",
        );
        let config = EngineConfig::standard();
        let resolver = ConflictResolver::new(&source, &target, &config);
        let naive = Mapping::from_entries(vec![entry(1, "150", "100"), entry(2, "151", "100")]);

        let state = ConflictState::Pending(Assignment {
            mapping: naive,
            unresolved: Vec::new(),
        });
        let state = resolver.step(state, &mut NullSink);
        assert!(matches!(state, ConflictState::Scheduling { pass: 0, .. }));

        let state = resolver.step(state, &mut NullSink);
        let ConflictState::Scheduling { pass, assignment } = &state else {
            panic!("expected scheduling, got {:?}", state);
        };
        assert_eq!(*pass, 1);
        assert!(assignment.mapping.is_injective());

        let state = resolver.step(state, &mut NullSink);
        assert!(matches!(state, ConflictState::Resolved { passes: 1, .. }));
        assert!(state.is_terminal());
    }

    #[test]
    fn test_injective_mapping_is_untouched() {
        let (source, target) = docs("1. A(id:1) 2. B(id:2)", "1. A(id:5)(id:1) 2. B(id:6)(id:2)");
        let mapping = Mapping::from_entries(vec![entry(1, "5", "1"), entry(2, "6", "2")]);
        let outcome = resolve_conflicts(
            &mapping,
            &source,
            &target,
            &EngineConfig::standard(),
            &mut NullSink,
        )
        .unwrap();
        assert_eq!(outcome.mapping, mapping);
        assert_eq!(outcome.passes, 0);
    }
}
