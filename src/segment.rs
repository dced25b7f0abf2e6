//! Splits raw document text into numbered questions.
//!
//! A question starts at a numbered marker (`12. `) and its primary id is the
//! first `(id:N)` tag after that marker. Its span runs up to the next marker
//! in question-number order, so every tag inside the span is an alternative.

use std::borrow::Cow;
use std::collections::HashSet;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::{DiagnosticSink, Stage};
use crate::document::{Document, Question};
use crate::errors::{EngineError, EngineResult};

/// `N. text (id:M)` with the shortest possible text run.
static QUESTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(\d+)\.\s+.*?\(id:(\d+)\)").expect("question marker regex is valid")
});

static ID_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(id:(\d+)\)").expect("id tag regex is valid"));

/// A matched question marker in the normalized text.
#[derive(Debug, Clone)]
struct Marker {
    number: String,
    primary_id: String,
    /// Byte range of the whole marker match.
    range: Range<usize>,
}

/// Decode markup character entities so escaped id tags are recognized.
pub fn normalize(raw: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(raw)
}

/// Every distinct id tag in `text`, first appearance first.
pub fn id_tags(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    ID_TAG
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Order key for a decimal string that cannot overflow.
fn numeric_key(digits: &str) -> (usize, &str) {
    let trimmed = digits.trim_start_matches('0');
    (trimmed.len(), trimmed)
}

/// Parse raw text into a [`Document`].
///
/// Fails when the text holds no numbered question at all.
pub fn segment(raw: &str, sink: &mut dyn DiagnosticSink) -> EngineResult<Document> {
    let text = normalize(raw);
    let text = text.as_ref();

    let mut markers: Vec<Marker> = QUESTION_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Marker {
                number: caps[1].to_string(),
                primary_id: caps[2].to_string(),
                range: whole.range(),
            })
        })
        .collect();

    if markers.is_empty() {
        return Err(EngineError::no_questions());
    }

    markers.dedup_by_key(|m| m.range.start);
    let in_text_order: Vec<usize> = markers.iter().map(|m| m.range.start).collect();
    markers.sort_by(|a, b| numeric_key(&a.number).cmp(&numeric_key(&b.number)));
    if markers.iter().map(|m| m.range.start).ne(in_text_order.iter().copied()) {
        sink.warning(
            Stage::Segment,
            "question numbers are out of text order; sorted by number".to_string(),
        );
    }

    sink.debug(
        Stage::Segment,
        format!("found {} numbered questions", markers.len()),
    );

    let mut questions = Vec::with_capacity(markers.len());
    for (idx, marker) in markers.iter().enumerate() {
        // A span ends where the next marker in the text begins, whatever its number.
        let following = in_text_order.partition_point(|&start| start <= marker.range.start);
        let end = in_text_order.get(following).copied().unwrap_or(text.len());
        let span = &text[marker.range.start..end];
        let alternatives = id_tags(span);

        sink.debug(
            Stage::Segment,
            format!(
                "Q{} (main {}) has {} unique ids",
                marker.number,
                marker.primary_id,
                alternatives.len()
            ),
        );

        questions.push(Question::new(idx + 1, marker.primary_id.clone(), alternatives));
    }

    Ok(Document::new(questions, id_tags(text).len()))
}
