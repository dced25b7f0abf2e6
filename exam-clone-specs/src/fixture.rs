//! Core types for parsed `.exam` fixture files.

use exam_clone::Shape;
use std::fmt;

/// A parsed `.exam` fixture.
#[derive(Debug, Clone)]
pub struct ExamFixture {
    /// Optional title from `# Title` header
    pub title: Option<String>,
    /// Raw text under `[target]`
    pub target: String,
    /// Raw text under `[source]`
    pub source: String,
    /// `> set key = value` lines, as TOML
    pub settings: Vec<String>,
    /// Everything else after `> `
    pub expectations: Vec<Expectation>,
}

/// One expected property of the reconciliation outcome.
#[derive(Debug, Clone)]
pub struct Expectation {
    pub check: Check,
    /// Source line number for error reporting
    pub source_line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// `shape = rich`
    Shape(Shape),
    /// `map 101 -> 100`
    Maps { from: String, to: String },
    /// `unmapped 101`: the source id must not be changed
    Unmapped(String),
    /// `correct 2`
    Correct(usize),
    /// `unresolved 3`
    Unresolved(usize),
    /// `uncovered 200`
    Uncovered(String),
    /// `changes = 2`
    Changes(usize),
    /// `error = conflict`
    Error(ErrorKind),
}

/// Which engine error a fixture expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Conflict,
    InvalidAssignment,
    Config,
}

impl ExamFixture {
    /// Create an empty fixture (for testing/building).
    pub fn empty() -> Self {
        Self {
            title: None,
            target: String::new(),
            source: String::new(),
            settings: Vec::new(),
            expectations: Vec::new(),
        }
    }

    /// Whether any expectation is an error.
    pub fn expects_error(&self) -> bool {
        self.expectations
            .iter()
            .any(|e| matches!(e.check, Check::Error(_)))
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidAssignment => "invalid_assignment",
            ErrorKind::Config => "config",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "parse" => Some(ErrorKind::Parse),
            "conflict" => Some(ErrorKind::Conflict),
            "invalid_assignment" => Some(ErrorKind::InvalidAssignment),
            "config" => Some(ErrorKind::Config),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Shape(shape) => write!(f, "shape = {}", shape),
            Check::Maps { from, to } => write!(f, "map {} -> {}", from, to),
            Check::Unmapped(id) => write!(f, "unmapped {}", id),
            Check::Correct(position) => write!(f, "correct {}", position),
            Check::Unresolved(position) => write!(f, "unresolved {}", position),
            Check::Uncovered(id) => write!(f, "uncovered {}", id),
            Check::Changes(count) => write!(f, "changes = {}", count),
            Check::Error(kind) => write!(f, "error = {}", kind),
        }
    }
}
