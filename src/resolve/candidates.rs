//! Candidate target ids for a source question.

use std::collections::{HashMap, HashSet};

use crate::document::{Document, Question};

/// Lookup tables derived once per (source, target) pair.
#[derive(Debug)]
pub struct ResolutionContext<'a> {
    pub source: &'a Document,
    pub target: &'a Document,
    target_mains: HashSet<&'a str>,
    source_mains: HashSet<&'a str>,
    /// Any target id → primary id of the first target question holding it.
    target_alternatives: HashMap<&'a str, &'a str>,
    target_duplicates: HashSet<&'a str>,
    /// Target mains already matched by a source primary.
    consumed: HashSet<&'a str>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(source: &'a Document, target: &'a Document) -> Self {
        let target_mains = target.main_ids();
        let source_mains = source.main_ids();
        let consumed = source_mains
            .iter()
            .copied()
            .filter(|id| target_mains.contains(id))
            .collect();
        Self {
            source,
            target,
            target_alternatives: target.alternative_index(),
            target_duplicates: target
                .duplicate_main_ids()
                .into_iter()
                .map(|(id, _)| id)
                .collect(),
            target_mains,
            source_mains,
            consumed,
        }
    }

    pub fn is_target_main(&self, id: &str) -> bool {
        self.target_mains.contains(id)
    }

    pub fn is_source_main(&self, id: &str) -> bool {
        self.source_mains.contains(id)
    }

    pub fn is_duplicate_target(&self, id: &str) -> bool {
        self.target_duplicates.contains(id)
    }

    pub fn is_consumed(&self, id: &str) -> bool {
        self.consumed.contains(id)
    }

    /// Whether the question already points at a target main.
    pub fn is_correct(&self, question: &Question) -> bool {
        self.is_target_main(&question.primary_id)
    }

    /// Valid target ids for `question`, best first.
    ///
    /// Walks the question's ids in appearance order. A target main is a
    /// candidate itself; any other id contributes the main of the target
    /// question whose span holds it. Ids that are already a source primary,
    /// or consumed by a correct question, are dropped.
    pub fn candidates(&self, question: &'a Question) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for alt in &question.alternative_ids {
            let alt = alt.as_str();
            let candidate = if alt != question.primary_id && self.is_target_main(alt) {
                Some(alt)
            } else {
                self.target_alternatives.get(alt).copied()
            };
            let Some(candidate) = candidate else { continue };
            if candidate == question.primary_id
                || self.is_source_main(candidate)
                || self.is_consumed(candidate)
            {
                continue;
            }
            if seen.insert(candidate) {
                out.push(candidate);
            }
        }
        out
    }

    /// Target mains nobody points at, in target order.
    pub fn uncovered<'m>(&self, mapped: impl IntoIterator<Item = &'m str>) -> Vec<&'a str> {
        let covered: HashSet<&str> = mapped.into_iter().collect();
        let mut seen = HashSet::new();
        self.target
            .questions()
            .iter()
            .map(|q| q.primary_id.as_str())
            .filter(|id| !self.is_consumed(id) && !covered.contains(id))
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
