//! Collector for diagnostics emitted while placing, shared by section tasks.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Collects diagnostics from the partitioner, the matcher and the kernel.
///
/// Emitting takes `&self`, so rayon tasks can share one sink. Per-severity
/// totals survive [`take_all`](Self::take_all) so a command can print a
/// summary after rendering.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    totals: [AtomicUsize; 3],
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            totals: Default::default(),
        }
    }

    // Diagnostics are pushed whole; a poisoned vector is still consistent.
    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.totals[diag.severity.index()].fetch_add(1, Ordering::Relaxed);
        self.lock().push(diag);
    }

    /// Number of diagnostics of `severity` emitted so far.
    pub fn count(&self, severity: Severity) -> usize {
        self.totals[severity.index()].load(Ordering::Relaxed)
    }

    /// Returns `true` if any error was emitted.
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Returns `true` if a pending diagnostic carries `code`, e.g. `"P002"`.
    pub fn has_code(&self, code: &str) -> bool {
        self.count_code(code) > 0
    }

    /// Number of pending diagnostics carrying `code`.
    pub fn count_code(&self, code: &str) -> usize {
        self.lock()
            .iter()
            .filter(|d| d.code.to_string() == code)
            .count()
    }

    /// Takes the pending diagnostics, leaving totals untouched.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Snapshot of the pending diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
