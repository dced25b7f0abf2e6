//! Question and document records shared by every stage.
//!
//! Both types are built once by [`segment`](crate::segment) and never
//! mutated afterwards.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A numbered question and the identifiers found in its text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// 1-based position in discovery order.
    pub position: usize,
    /// The identifier the question currently points to.
    pub primary_id: String,
    /// Every identifier in the span, first appearance first. Contains `primary_id`.
    pub alternative_ids: Vec<String>,
}

impl Question {
    pub fn new(position: usize, primary_id: impl Into<String>, alternative_ids: Vec<String>) -> Self {
        let primary_id = primary_id.into();
        let mut seen = HashSet::new();
        let mut ids: Vec<String> = Vec::with_capacity(alternative_ids.len() + 1);
        for id in alternative_ids {
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
        if !seen.contains(&primary_id) {
            ids.insert(0, primary_id.clone());
        }
        Self {
            position,
            primary_id,
            alternative_ids: ids,
        }
    }

    /// Alternatives other than the primary id, in appearance order.
    pub fn other_ids(&self) -> impl Iterator<Item = &str> {
        self.alternative_ids
            .iter()
            .map(String::as_str)
            .filter(move |id| *id != self.primary_id)
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.alternative_ids.iter().any(|a| a == id)
    }
}

/// An ordered sequence of questions parsed from one text blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    questions: Vec<Question>,
    /// Distinct `(id:N)` markers anywhere in the text, ignoring structure.
    distinct_id_count: usize,
}

impl Document {
    /// Build a document from questions in position order.
    ///
    /// Positions are reassigned `1..=N` so the invariant holds regardless of input.
    pub fn new(questions: Vec<Question>, distinct_id_count: usize) -> Self {
        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(idx, q)| Question {
                position: idx + 1,
                ..q
            })
            .collect();
        Self {
            questions,
            distinct_id_count,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn distinct_id_count(&self) -> usize {
        self.distinct_id_count
    }

    /// Question at a 1-based position.
    pub fn question_at(&self, position: usize) -> Option<&Question> {
        position
            .checked_sub(1)
            .and_then(|idx| self.questions.get(idx))
    }

    /// Position of the first question whose primary id is `id`.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.questions
            .iter()
            .find(|q| q.primary_id == id)
            .map(|q| q.position)
    }

    /// The set of primary ids.
    pub fn main_ids(&self) -> HashSet<&str> {
        self.questions.iter().map(|q| q.primary_id.as_str()).collect()
    }

    /// Primary ids that appear at more than one position, with those positions.
    ///
    /// Ordered by the first position of each duplicate.
    pub fn duplicate_main_ids(&self) -> Vec<(&str, Vec<usize>)> {
        let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut order = Vec::new();
        for q in &self.questions {
            let entry = positions.entry(q.primary_id.as_str()).or_default();
            if entry.is_empty() {
                order.push(q.primary_id.as_str());
            }
            entry.push(q.position);
        }
        order
            .into_iter()
            .filter_map(|id| {
                let found = positions.remove(id)?;
                if found.len() > 1 {
                    Some((id, found))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Maps every identifier to the primary id of the first question whose span holds it.
    pub fn alternative_index(&self) -> HashMap<&str, &str> {
        let mut index = HashMap::new();
        for q in &self.questions {
            for alt in &q.alternative_ids {
                index.entry(alt.as_str()).or_insert(q.primary_id.as_str());
            }
        }
        index
    }
}
