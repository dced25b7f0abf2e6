//! Structured diagnostics emitted by every stage.
//!
//! Stages never write to a global logger. They receive a
//! [`DiagnosticSink`] and push [`Diagnostic`] values into it; the caller
//! decides whether those are collected, dropped or forwarded to `tracing`.

use serde::Serialize;
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Level {
    /// Trace of a decision the engine took.
    Debug,
    /// An anomaly in the input that did not stop resolution.
    Warning,
}

/// The stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Segment,
    Classify,
    Resolve,
    Schedule,
    Conflict,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Segment => "segment",
            Stage::Classify => "classify",
            Stage::Resolve => "resolve",
            Stage::Schedule => "schedule",
            Stage::Conflict => "conflict",
        }
    }
}

/// A single trace line produced during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub stage: Stage,
    pub message: String,
}

impl Diagnostic {
    pub fn debug(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            level: Level::Debug,
            stage,
            message: message.into(),
        }
    }

    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            Level::Debug => "debug",
            Level::Warning => "warning",
        };
        write!(f, "[{}] {}: {}", level, self.stage.name(), self.message)
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);

    fn debug(&mut self, stage: Stage, message: String) {
        self.emit(Diagnostic::debug(stage, message));
    }

    fn warning(&mut self, stage: Stage, message: String) {
        self.emit(Diagnostic::warning(stage, message));
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics to `tracing` events.
///
/// Nothing is printed unless the caller installed a subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let stage = diagnostic.stage.name();
        match diagnostic.level {
            Level::Debug => tracing::debug!(stage, "{}", diagnostic.message),
            Level::Warning => tracing::warn!(stage, "{}", diagnostic.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.debug(Stage::Segment, "first".to_string());
        sink.warning(Stage::Conflict, "second".to_string());

        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].level, Level::Debug);
        assert_eq!(sink[1].stage, Stage::Conflict);
        assert_eq!(sink[1].to_string(), "[warning] conflict: second");
    }

    #[test]
    fn test_null_and_tracing_sinks_accept_input() {
        let mut null = NullSink;
        null.debug(Stage::Resolve, "dropped".to_string());

        // No subscriber installed: the event is simply discarded.
        let mut tracing_sink = TracingSink;
        tracing_sink.warning(Stage::Classify, "forwarded".to_string());
    }
}
