//! Which competitor keeps a disputed target id.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A source question claiming a target id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Competitor<'a> {
    pub position: usize,
    pub source_id: &'a str,
}

/// Ordering policy for the competitors of a conflict.
///
/// The competitor that sorts first keeps the target id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TieBreak {
    /// Lowest source position wins.
    #[default]
    EarlierPosition,
    /// Highest source position wins.
    LaterPosition,
    /// Listed source ids win in list order; everyone else by earlier position.
    Pinned { source_ids: Vec<String> },
}

impl TieBreak {
    pub fn compare(&self, a: &Competitor<'_>, b: &Competitor<'_>) -> Ordering {
        match self {
            TieBreak::EarlierPosition => a.position.cmp(&b.position),
            TieBreak::LaterPosition => b.position.cmp(&a.position),
            TieBreak::Pinned { source_ids } => {
                let rank = |c: &Competitor<'_>| {
                    source_ids
                        .iter()
                        .position(|id| id == c.source_id)
                        .unwrap_or(usize::MAX)
                };
                rank(a)
                    .cmp(&rank(b))
                    .then_with(|| a.position.cmp(&b.position))
            }
        }
    }

    /// Sort competitors so the winner comes first.
    pub fn order(&self, competitors: &mut [Competitor<'_>]) {
        competitors.sort_by(|a, b| self.compare(a, b));
    }
}
