//! Error types for Gem operations.
//!
//! This module provides the main error type [`GemError`] which wraps the
//! error conditions that can occur while compiling a document.

use std::io;

use thiserror::Error;

use gem_parser::error::CompileError;

/// The main error type for Gem operations.
///
/// # Diagnostic Variants
///
/// The `Compile` variant keeps the document source next to the diagnostics
/// so their spans can be rendered as annotated snippets.
#[derive(Debug, Error)]
pub enum GemError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Compile { err: CompileError, src: String },
}

impl GemError {
    /// Create a new `Compile` error with the associated source code.
    pub fn new_compile_error(err: CompileError, src: impl Into<String>) -> Self {
        Self::Compile {
            err,
            src: src.into(),
        }
    }
}
