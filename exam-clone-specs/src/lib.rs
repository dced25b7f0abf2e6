//! Fixture-driven regression harness for exam-clone.
//!
//! Test cases live in `.exam` files: a target document, a source document
//! and one expectation per `> ` line. The harness runs the engine on each
//! fixture and reports every expectation that does not hold.
//!
//! ## Modules
//!
//! - [`parser`] - Parses `.exam` fixture files
//! - [`fixture`] - Fixture and expectation types
//! - [`loader`] - Loads fixtures from disk
//! - [`config`] - Engine settings shared across fixtures
//! - [`runner`] - Runs fixtures and checks expectations
//! - [`errors`] - Error types for the harness
//! - [`formatter`] - Failure and summary formatting
//! - [`failures`] - Expected failures tracking via TOML

pub mod config;
pub mod errors;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod parser;
pub mod runner;

pub use config::HarnessConfig;
pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{Check, ErrorKind, ExamFixture, Expectation};
pub use formatter::{format_failure, format_summary};
pub use loader::{load_all_fixtures, load_fixture};
pub use parser::parse_fixture;
pub use runner::{check_fixture, run_fixture, CheckOutcome, CheckResult, FixtureRun};
