//! Reconciliation results and their text report.

use serde::Serialize;
use std::fmt;

use crate::diagnostics::Diagnostic;
use crate::mapping::Mapping;
use crate::shape::Classification;

/// What happens to one source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Status {
    /// The current id is already the main of the target question at
    /// `target_position`.
    Correct { target_position: usize },
    /// Switch to the given target id.
    Change { to: String },
    /// No valid target id could be found.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionReport {
    pub position: usize,
    pub current_id: String,
    pub status: Status,
}

/// Full result of reconciling a source document against a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Shape of the target document.
    pub classification: Classification,
    /// Injective source → target id changes.
    pub mapping: Mapping,
    /// One entry per source position, in position order.
    pub positions: Vec<PositionReport>,
    pub correct: Vec<usize>,
    pub changed: Vec<usize>,
    pub unresolved: Vec<usize>,
    /// Target mains that no source position ends up pointing at.
    pub uncovered_targets: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Counts for the summary block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub changes: usize,
    pub correct: usize,
    pub unknown: usize,
    pub total: usize,
    pub success_percent: f64,
}

impl Outcome {
    pub fn summary(&self) -> Summary {
        let changes = self.changed.len();
        let correct = self.correct.len();
        let total = self.positions.len();
        let success_percent = if total == 0 {
            0.0
        } else {
            (changes + correct) as f64 / total as f64 * 100.0
        };
        Summary {
            changes,
            correct,
            unknown: self.unresolved.len(),
            total,
            success_percent,
        }
    }

    /// Line-per-question report with a summary block.
    pub fn report(&self) -> Report<'_> {
        Report { outcome: self }
    }
}

pub struct Report<'a> {
    outcome: &'a Outcome,
}

impl<'a> fmt::Display for Report<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.outcome;
        writeln!(f, "EXAM CLONE REPORT")?;
        writeln!(
            f,
            "Target: {} ({})",
            outcome.classification.shape, outcome.classification.diagnostic
        )?;
        writeln!(f)?;

        for line in &outcome.positions {
            match &line.status {
                Status::Correct { target_position } => writeln!(
                    f,
                    "Question #{}: Already correct (ID:{}) - matches target Q{}",
                    line.position, line.current_id, target_position
                )?,
                Status::Change { to } => writeln!(
                    f,
                    "Question #{}: Change (ID:{}) -> (ID:{})",
                    line.position, line.current_id, to
                )?,
                Status::Unresolved => writeln!(
                    f,
                    "Question #{}: No suitable alternatives (current ID:{})",
                    line.position, line.current_id
                )?,
            }
        }

        let summary = outcome.summary();
        writeln!(f)?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "Changes needed: {}", summary.changes)?;
        writeln!(f, "Already correct: {}", summary.correct)?;
        writeln!(f, "Unknown IDs: {}", summary.unknown)?;
        writeln!(f, "Total positions: {}", summary.total)?;
        write!(f, "Mapping success: {:.1}%", summary.success_percent)?;
        if !outcome.uncovered_targets.is_empty() {
            writeln!(f)?;
            write!(
                f,
                "Uncovered target IDs: {}",
                outcome.uncovered_targets.join(", ")
            )?;
        }
        Ok(())
    }
}
