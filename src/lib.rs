//! Question identifier reconciliation between two exam documents.
//!
//! A *target* document carries the authoritative ids: every numbered
//! question has one main id and possibly several alternatives. A *source*
//! document numbers the same questions but may carry stale ids. The engine
//! works out which source ids must change, and to what, so that every
//! changed question lands on a distinct target main id.
//!
//! ## Stages
//!
//! - [`segment`] - Splits raw text into numbered [`Question`]s with their ids
//! - [`classify`] - Decides whether a document is [`Shape::Rich`] (several
//!   ids per question) or [`Shape::Poor`]
//! - [`resolve_mapping`] - Builds a tentative [`Mapping`], by direct
//!   alternative lookup for rich documents and by most-constrained-first
//!   scheduling for poor ones
//! - [`resolve_conflicts`] - Makes the mapping injective within
//!   [`EngineConfig::max_passes`] passes
//!
//! [`Engine`] runs all four and returns an [`Outcome`] whose
//! [`report`](Outcome::report) prints one line per question.
//!
//! ## Example
//!
//! ```
//! use exam_clone::Engine;
//!
//! let outcome = Engine::default()
//!     .reconcile(
//!         "1. What is 2+2? (id:100) (id:101)\n2. Capital of France? (id:200)",
//!         "1. What is 2+2? (id:101)\n2. Capital of France? (id:200)",
//!     )
//!     .unwrap();
//!
//! assert_eq!(outcome.mapping.get("101"), Some("100"));
//! assert_eq!(outcome.correct, vec![2]);
//! ```

mod config;
mod diagnostics;
mod document;
mod engine;
mod errors;
mod mapping;
mod outcome;
mod segment;
mod shape;
mod tie_break;

pub mod conflict;
pub mod resolve;

pub use config::EngineConfig;
pub use conflict::{detect_conflicts, resolve_conflicts, Conflict, ConflictOutcome};
pub use diagnostics::{Diagnostic, DiagnosticSink, Level, NullSink, Stage, TracingSink};
pub use document::{Document, Question};
pub use engine::Engine;
pub use errors::{EngineError, EngineResult};
pub use mapping::{Mapping, MappingEntry};
pub use outcome::{Outcome, PositionReport, Report, Status, Summary};
pub use resolve::{resolve_mapping, Resolution};
pub use segment::{id_tags, normalize, segment};
pub use shape::{classify, Classification, Shape};
pub use tie_break::{Competitor, TieBreak};
