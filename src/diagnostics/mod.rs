use crate::span::Span;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Hard failures that abort the whole generation run. Anything recoverable is
/// reported as a [`Diagnostic`] instead so unrelated call sites still emit.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("Manifest error: {msg}")]
    Manifest { msg: String, path: PathBuf },

    #[error("Io error: {msg}")]
    Io { msg: String },
}

impl GenError {
    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn manifest(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Manifest { msg: msg.into(), path }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io { msg: msg.into() }
    }
}

/// Stable diagnostic codes. Codes are part of the tool's public surface and
/// must never be renumbered.
pub mod codes {
    /// Target type is sealed and cannot be proxied.
    pub const SEALED_TARGET: &str = "PRET0001";
    /// Argument shape the spec builder does not handle.
    pub const UNSUPPORTED_ARGUMENT: &str = "PRET0002";
    /// Member kind the proxy emitter does not handle.
    pub const UNSUPPORTED_MEMBER: &str = "PRET0003";
    /// Host language version lacks the interception feature.
    pub const LANGUAGE_VERSION: &str = "PRET0004";
    /// Setup/verify lambda is not a direct member use of its parameter.
    pub const INVALID_SETUP_LAMBDA: &str = "PRET0005";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A structured, per-candidate diagnostic. One bad call site reports here and
/// never suppresses generation for the rest of the compilation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    /// None for compilation-wide diagnostics (e.g. language version gate).
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self { code, severity: Severity::Error, message: message.into(), span: Some(span) }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self { code, severity: Severity::Warning, message: message.into(), span: Some(span) }
    }

    pub fn global(code: &'static str, message: impl Into<String>) -> Self {
        Self { code, severity: Severity::Error, message: message.into(), span: None }
    }
}

/// Render a GenError with ariadne for nice terminal output.
pub fn render_error(source: &str, _filename: &str, err: &GenError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err {
        GenError::Syntax { msg, span } => {
            Report::build(ReportKind::Error, (), span.start)
                .with_message("syntax error")
                .with_label(
                    Label::new(span.start..span.end)
                        .with_message(msg),
                )
                .finish()
                .eprint(Source::from(source))
                .unwrap();
        }
        GenError::Io { msg } => {
            eprintln!("error: {msg}");
        }
        GenError::Manifest { msg, path } => {
            eprintln!("error[manifest]: {msg}");
            eprintln!("  --> {}", path.display());
        }
    }
}

/// Render a structured diagnostic against the source file its span points at.
pub fn render_diagnostic(source: &str, _filename: &str, diag: &Diagnostic) {
    use ariadne::{Label, Report, ReportKind, Source};

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };
    match diag.span {
        Some(span) => {
            Report::build(kind, (), span.start)
                .with_code(diag.code)
                .with_message(&diag.message)
                .with_label(
                    Label::new(span.start..span.end)
                        .with_message(&diag.message),
                )
                .finish()
                .eprint(Source::from(source))
                .unwrap();
        }
        None => {
            eprintln!("error[{}]: {}", diag.code, diag.message);
        }
    }
}
