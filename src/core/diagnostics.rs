//! Sinks for the warnings and errors the parsers report while decoding.
//!
//! Parsers never log directly for recoverable problems. They hand each
//! message to a [`Diagnostics`] implementation supplied by the caller:
//! [`TracingDiagnostics`] forwards to `tracing`, while
//! [`CollectingDiagnostics`] keeps the messages so they can be inspected.

use tracing::{error, warn};

/// Receiver for recoverable parse problems
pub trait Diagnostics {
    /// A line or value was ignored
    fn warn(&mut self, message: &str);

    /// A value was present but could not be decoded
    fn error(&mut self, message: &str);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn warn(&mut self, message: &str) {
        (**self).warn(message);
    }

    fn error(&mut self, message: &str) {
        (**self).error(message);
    }
}

/// Forwards diagnostics to the global `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&mut self, message: &str) {
        warn!("{message}");
    }

    fn error(&mut self, message: &str) {
        error!("{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Keeps every diagnostic in the order it was reported
#[derive(Debug, Clone, Default)]
pub struct CollectingDiagnostics {
    entries: Vec<Diagnostic>,
}

impl CollectingDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Messages reported at warning level
    pub fn warnings(&self) -> Vec<&str> {
        self.messages(Severity::Warning)
    }

    /// Messages reported at error level
    pub fn errors(&self) -> Vec<&str> {
        self.messages(Severity::Error)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn messages(&self, severity: Severity) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.as_str())
            .collect()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn warn(&mut self, message: &str) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            message: message.to_string(),
        });
    }

    fn error(&mut self, message: &str) {
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            message: message.to_string(),
        });
    }
}
