//! Error types for the reconciliation engine.
//!
//! Only whole-document failures are errors. A question that cannot be
//! resolved is reported on the [`Outcome`](crate::Outcome) instead.

use thiserror::Error;

/// Errors that can occur while reconciling two documents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The document has no recognizable numbered-question structure.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Conflict resolution did not converge within the pass cap.
    #[error("conflict resolution did not converge; unresolved positions: {unresolved:?}")]
    Conflict { unresolved: Vec<usize> },

    /// A final mapping assigned one target id to several positions.
    #[error("target id {target_id} assigned to several positions: {positions:?}")]
    InvalidAssignment {
        target_id: String,
        positions: Vec<usize>,
    },

    /// The engine configuration is unreadable or out of range.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl EngineError {
    pub(crate) fn no_questions() -> Self {
        EngineError::Parse {
            message: "no numbered questions found".to_string(),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
