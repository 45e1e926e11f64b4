//! Diagnostic creation, severity management, and terminal rendering.
//!
//! The placer never prints. Every non-fatal condition (performance warnings,
//! ignored blockages, run summaries) is emitted as a structured [`Diagnostic`]
//! into a thread-safe [`DiagnosticSink`], which front ends drain and format
//! with a [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
