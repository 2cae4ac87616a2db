//! Diagnostic events emitted during a migration run.
//!
//! The engine and the rules never log directly: they build a [`Diagnostic`]
//! and hand it to a [`DiagnosticSink`]. Emitting never fails.

use std::cell::RefCell;
use std::fmt;

use serde::Serialize;

use crate::trace::Trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reported event: what happened, how bad it is, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub source: String,
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, trace: &Trace, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            source: trace.source().to_string(),
            path: trace.path().to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] File: {}: {}", self.severity, self.source, self.message)
        } else {
            write!(
                f,
                "[{}] File: {} in {}: {}",
                self.severity, self.source, self.path, self.message
            )
        }
    }
}

/// Destination for diagnostics. Implementations must not panic.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Records every diagnostic in emission order and mirrors it to `tracing`.
///
/// Single-threaded by construction: one migration batch owns one collector.
#[derive(Debug)]
pub struct Diagnostics {
    records: RefCell<Vec<Diagnostic>>,
    mirror: bool,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics {
            records: RefCell::new(Vec::new()),
            mirror: true,
        }
    }

    /// A collector that does not mirror to `tracing`. Its records are held
    /// back until the caller decides to [`publish`](Self::publish) them.
    pub fn buffered() -> Self {
        Diagnostics {
            records: RefCell::new(Vec::new()),
            mirror: false,
        }
    }

    /// Emit every record into `sink`, draining this collector.
    pub fn publish(&self, sink: &dyn DiagnosticSink) {
        for d in self.take() {
            sink.emit(d);
        }
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.records.borrow().clone()
    }

    /// Drain the recorded diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Messages of the given severity, in emission order.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.clone())
            .collect()
    }
}

impl DiagnosticSink for Diagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        if self.mirror {
            forward_to_tracing(&diagnostic);
        }
        self.records.borrow_mut().push(diagnostic);
    }
}

fn forward_to_tracing(d: &Diagnostic) {
    match d.severity {
        Severity::Info => {
            tracing::info!(source = %d.source, path = %d.path, "{}", d.message)
        }
        Severity::Warning => {
            tracing::warn!(source = %d.source, path = %d.path, "{}", d.message)
        }
        Severity::Error => {
            tracing::error!(source = %d.source, path = %d.path, "{}", d.message)
        }
    }
}
