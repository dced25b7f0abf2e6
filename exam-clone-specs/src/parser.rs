//! Parser for `.exam` fixture files.

use crate::errors::{SpecError, SpecResult};
use crate::fixture::{Check, ErrorKind, ExamFixture, Expectation};
use exam_clone::Shape;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Target,
    Source,
}

/// Parse a full `.exam` fixture file.
pub fn parse_fixture(input: &str) -> SpecResult<ExamFixture> {
    let mut fixture = ExamFixture::empty();
    let mut section = Section::Preamble;
    let mut target_lines: Vec<&str> = Vec::new();
    let mut source_lines: Vec<&str> = Vec::new();

    for (line_num, line) in input.lines().enumerate() {
        let line_num = line_num + 1;
        let trimmed = line.trim();

        if trimmed.starts_with("# ") && fixture.title.is_none() && section == Section::Preamble {
            fixture.title = Some(trimmed[2..].trim().to_string());
        } else if trimmed == "[target]" {
            section = Section::Target;
        } else if trimmed == "[source]" {
            section = Section::Source;
        } else if let Some(directive) = trimmed.strip_prefix("> ") {
            let directive = directive.trim();
            if let Some(setting) = directive.strip_prefix("set ") {
                fixture.settings.push(setting.trim().to_string());
            } else {
                fixture.expectations.push(Expectation {
                    check: parse_check(directive, line_num)?,
                    source_line: line_num,
                });
            }
        } else if trimmed.starts_with("//") {
            // comment
        } else {
            match section {
                Section::Target => target_lines.push(line),
                Section::Source => source_lines.push(line),
                Section::Preamble if trimmed.is_empty() => {}
                Section::Preamble => {
                    return Err(SpecError::Parse {
                        line: line_num,
                        message: format!("text before [target] or [source]: {}", trimmed),
                    });
                }
            }
        }
    }

    fixture.target = target_lines.join("\n").trim().to_string();
    fixture.source = source_lines.join("\n").trim().to_string();
    Ok(fixture)
}

/// Parse one expectation: `shape = rich`, `map 101 -> 100`, `correct 2`...
fn parse_check(input: &str, source_line: usize) -> SpecResult<Check> {
    let (keyword, rest) = match input.find(|c: char| c.is_whitespace() || c == '=') {
        Some(idx) => (&input[..idx], input[idx..].trim()),
        None => (input, ""),
    };
    let value = rest.strip_prefix('=').unwrap_or(rest).trim();

    let missing = || SpecError::Parse {
        line: source_line,
        message: format!("missing value for '{}'", keyword),
    };
    if value.is_empty() {
        return Err(missing());
    }

    match keyword {
        "shape" => {
            let shape = match value {
                "rich" => Shape::Rich,
                "poor" => Shape::Poor,
                "unknown" => Shape::Unknown,
                other => {
                    return Err(SpecError::Parse {
                        line: source_line,
                        message: format!("unknown shape '{}'", other),
                    })
                }
            };
            Ok(Check::Shape(shape))
        }
        "map" => {
            let (from, to) = value.split_once("->").ok_or_else(|| SpecError::Parse {
                line: source_line,
                message: format!("expected 'map FROM -> TO': {}", input),
            })?;
            let (from, to) = (from.trim(), to.trim());
            if from.is_empty() || to.is_empty() {
                return Err(missing());
            }
            Ok(Check::Maps {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
        "unmapped" => Ok(Check::Unmapped(value.to_string())),
        "uncovered" => Ok(Check::Uncovered(value.to_string())),
        "correct" => Ok(Check::Correct(parse_number(value, source_line)?)),
        "unresolved" => Ok(Check::Unresolved(parse_number(value, source_line)?)),
        "changes" => Ok(Check::Changes(parse_number(value, source_line)?)),
        "error" => ErrorKind::from_name(value)
            .map(Check::Error)
            .ok_or_else(|| SpecError::Parse {
                line: source_line,
                message: format!("unknown error kind '{}'", value),
            }),
        other => Err(SpecError::Parse {
            line: source_line,
            message: format!("unknown expectation '{}'", other),
        }),
    }
}

fn parse_number(input: &str, source_line: usize) -> SpecResult<usize> {
    input.parse().map_err(|_| SpecError::Parse {
        line: source_line,
        message: format!("expected a number, found '{}'", input),
    })
}
