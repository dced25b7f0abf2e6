//! Runs fixtures through the engine and checks their expectations.

use exam_clone::{Engine, EngineError, Outcome, Status};

use crate::config::HarnessConfig;
use crate::errors::SpecResult;
use crate::fixture::{Check, ErrorKind, ExamFixture, Expectation};

/// Result of running a fixture through the engine.
#[derive(Debug)]
pub struct FixtureRun {
    pub result: Result<Outcome, EngineError>,
}

/// Result of checking one expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    /// The check ran and saw something else.
    Failed { actual: String },
    /// The engine errored and the check needs an outcome.
    NoOutcome { error: String },
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, CheckOutcome::Passed)
    }
}

/// One expectation with its outcome.
#[derive(Debug, Clone)]
pub struct CheckResult<'a> {
    pub expectation: &'a Expectation,
    pub outcome: CheckOutcome,
}

/// Run a fixture through the engine.
///
/// Only the fixture's configuration can fail here; engine errors are part
/// of the run and are matched by `error = ...` expectations.
pub fn run_fixture(fixture: &ExamFixture, config: &HarnessConfig) -> SpecResult<FixtureRun> {
    let engine_config = config.engine_config(fixture)?;
    let result =
        Engine::new(engine_config).and_then(|engine| engine.reconcile(&fixture.target, &fixture.source));
    Ok(FixtureRun { result })
}

/// Check every expectation of `fixture` against a run.
///
/// A fixture without an `error` expectation implicitly expects success; an
/// engine error then fails every check.
pub fn check_fixture<'a>(fixture: &'a ExamFixture, run: &FixtureRun) -> Vec<CheckResult<'a>> {
    fixture
        .expectations
        .iter()
        .map(|expectation| CheckResult {
            expectation,
            outcome: check_expectation(&expectation.check, &run.result),
        })
        .collect()
}

fn check_expectation(check: &Check, result: &Result<Outcome, EngineError>) -> CheckOutcome {
    let outcome = match (check, result) {
        (Check::Error(expected), Err(err)) => {
            let actual = error_kind(err);
            return if *expected == actual {
                CheckOutcome::Passed
            } else {
                CheckOutcome::Failed {
                    actual: format!("error = {} ({})", actual, err),
                }
            };
        }
        (Check::Error(_), Ok(outcome)) => {
            return CheckOutcome::Failed {
                actual: format!("no error; mapping {}", outcome.mapping),
            }
        }
        (_, Err(err)) => {
            return CheckOutcome::NoOutcome {
                error: err.to_string(),
            }
        }
        (_, Ok(outcome)) => outcome,
    };

    let passed = match check {
        Check::Shape(shape) => outcome.classification.shape == *shape,
        Check::Maps { from, to } => outcome.mapping.get(from) == Some(to.as_str()),
        Check::Unmapped(id) => outcome.mapping.get(id).is_none(),
        Check::Correct(position) => outcome.correct.contains(position),
        Check::Unresolved(position) => outcome.unresolved.contains(position),
        Check::Uncovered(id) => outcome.uncovered_targets.iter().any(|t| t == id),
        Check::Changes(count) => outcome.changed.len() == *count,
        Check::Error(_) => false,
    };
    if passed {
        return CheckOutcome::Passed;
    }

    CheckOutcome::Failed {
        actual: describe_actual(check, outcome),
    }
}

fn describe_actual(check: &Check, outcome: &Outcome) -> String {
    match check {
        Check::Shape(_) => format!("shape = {}", outcome.classification.shape),
        Check::Maps { from, .. } | Check::Unmapped(from) => match outcome.mapping.get(from) {
            Some(to) => format!("map {} -> {}", from, to),
            None => format!("{} is not mapped", from),
        },
        Check::Correct(position) | Check::Unresolved(position) => {
            match outcome.positions.iter().find(|p| p.position == *position) {
                Some(line) => match &line.status {
                    Status::Correct { target_position } => format!(
                        "position {} is correct (target Q{})",
                        position, target_position
                    ),
                    Status::Change { to } => format!("position {} changes to {}", position, to),
                    Status::Unresolved => format!("position {} is unresolved", position),
                },
                None => format!("no question at position {}", position),
            }
        }
        Check::Uncovered(_) => format!("uncovered = {:?}", outcome.uncovered_targets),
        Check::Changes(_) => format!("changes = {}", outcome.changed.len()),
        Check::Error(_) => "no error".to_string(),
    }
}

pub fn error_kind(err: &EngineError) -> ErrorKind {
    match err {
        EngineError::Parse { .. } => ErrorKind::Parse,
        EngineError::Conflict { .. } => ErrorKind::Conflict,
        EngineError::InvalidAssignment { .. } => ErrorKind::InvalidAssignment,
        EngineError::Config { .. } => ErrorKind::Config,
    }
}
