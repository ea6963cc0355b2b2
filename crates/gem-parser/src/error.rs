//! Error and diagnostic system for the Gem compiler.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - An [`ErrorKind`] taxonomy grouped by compile [`Phase`]
//! - Multiple labeled spans for rich error context
//! - Severity levels
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Diagnostics are wrapped in [`CompileError`] for
//! returning from the compile pipeline.
//!
//! # Example
//!
//! ```
//! # use gem_parser::error::{Diagnostic, ErrorCode, ErrorKind};
//! # use gem_parser::Span;
//!
//! let diag = Diagnostic::error("duplicate id `header`")
//!     .with_code(ErrorCode::E302)
//!     .with_label(Span::new(100..108), "duplicate id")
//!     .with_secondary_label(Span::new(50..58), "first used here")
//!     .with_help("ids must be unique across the whole document");
//!
//! assert_eq!(diag.code().map(|c| c.kind()), Some(ErrorKind::DuplicateId));
//! ```

mod collector;
mod compile_error;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub(crate) use collector::DiagnosticCollector;
pub(crate) use compile_error::Result;

pub use compile_error::CompileError;
pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, ErrorKind, Phase};
pub use label::Label;
pub use severity::Severity;
