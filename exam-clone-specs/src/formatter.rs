//! Failure formatting for fixture expectations.

use exam_clone::Outcome;
use std::fmt::Write;

use crate::fixture::{Check, Expectation};
use crate::runner::CheckOutcome;

/// Format a failed expectation with the fixture's report as context.
pub fn format_failure(
    fixture_name: &str,
    expectation: &Expectation,
    outcome: &CheckOutcome,
    report: Option<&Outcome>,
) -> String {
    let mut output = String::new();

    writeln!(output, "\nFAIL: {}:{}", fixture_name, expectation.source_line).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "  expected: {}", expectation.check).unwrap();

    match outcome {
        CheckOutcome::Failed { actual } => {
            writeln!(output, "  actual:   {}", actual).unwrap();
        }
        CheckOutcome::NoOutcome { error } => {
            writeln!(output, "  engine failed: {}", error).unwrap();
        }
        CheckOutcome::Passed => {
            writeln!(output, "  (passed)").unwrap();
        }
    }

    if let Some(report) = report {
        writeln!(output).unwrap();
        for line in report.report().to_string().lines() {
            let quoted = format!("  | {}", line);
            writeln!(output, "{}", quoted.trim_end()).unwrap();
        }
    }

    if let Some(hint) = generate_hint(&expectation.check, outcome) {
        writeln!(output).unwrap();
        writeln!(output, "  hint: {}", hint).unwrap();
    }

    output
}

/// Format a summary for one fixture.
pub fn format_summary(
    fixture_name: &str,
    passed: usize,
    failed: usize,
    expected_failures: usize,
    regressions: usize,
) -> String {
    let mut output = String::new();

    let status = if regressions > 0 { "FAIL" } else { "PASS" };

    writeln!(output, "\n{}: {}", status, fixture_name).unwrap();
    writeln!(
        output,
        "  {} passed, {} failed ({} expected, {} regressions)",
        passed, failed, expected_failures, regressions
    )
    .unwrap();

    output
}

fn generate_hint(check: &Check, outcome: &CheckOutcome) -> Option<String> {
    match (check, outcome) {
        (_, CheckOutcome::NoOutcome { .. }) => Some(
            "the engine returned an error - add `> error = ...` if that is intended".to_string(),
        ),
        (Check::Maps { .. }, CheckOutcome::Failed { actual }) if actual.ends_with("not mapped") => {
            Some(
                "the source id got no target - check that the target lists it as an alternative"
                    .to_string(),
            )
        }
        (Check::Shape(_), CheckOutcome::Failed { .. }) => Some(
            "shape depends on the first questions only - `> set shape_override = ...` pins it"
                .to_string(),
        ),
        _ => None,
    }
}
