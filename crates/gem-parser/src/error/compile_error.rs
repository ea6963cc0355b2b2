//! The CompileError type for wrapping compile diagnostics.
//!
//! [`CompileError`] wraps one or more [`Diagnostic`]s produced by a stage of
//! the compile pipeline.

use std::fmt;

use crate::error::{Diagnostic, ErrorKind};

/// A type alias for `Result<T, Diagnostic>`.
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// Error type for the compile pipeline.
///
/// Wraps one or more diagnostics. The first diagnostic is the one that
/// stopped the compile; its code decides the [`ErrorKind`].
#[derive(Debug)]
pub struct CompileError {
    diagnostics: Vec<Diagnostic>,
}

impl CompileError {
    /// Create a new compile error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The kind of the first coded diagnostic.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.diagnostics
            .iter()
            .find_map(|diag| diag.code())
            .map(|code| code.kind())
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{first}")?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {}

impl From<Diagnostic> for CompileError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for CompileError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_compile_error_from_diagnostic() {
        let diag = Diagnostic::error("test error").with_code(ErrorCode::E300);
        let err: CompileError = diag.into();

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].message(), "test error");
        assert_eq!(err.kind(), Some(ErrorKind::MissingWindow));
    }

    #[test]
    fn test_compile_error_kind_without_code() {
        let err: CompileError = Diagnostic::error("plain").into();
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_compile_error_display_single() {
        let err: CompileError = Diagnostic::error("unknown tag").into();

        assert_eq!(err.to_string(), "error: unknown tag");
    }

    #[test]
    fn test_compile_error_display_multiple() {
        let diags = vec![
            Diagnostic::error("first error"),
            Diagnostic::error("second error"),
            Diagnostic::error("third error"),
        ];
        let err: CompileError = diags.into();

        assert_eq!(err.to_string(), "error: first error (+2 more)");
    }
}
