//! Configuration types for Gem compilation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`CompilerConfig`] - Options that change how documents compile.
//! - [`IncludeConfig`] - Where `<include>` paths are resolved from.
//!
//! # Example
//!
//! ```
//! # use gem::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.compiler().inline_markdown());
//! assert!(config.include().root().is_none());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use gem_parser::CompileConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Compiler section.
    #[serde(default)]
    compiler: CompilerConfig,

    /// Include section.
    #[serde(default)]
    include: IncludeConfig,
}

impl AppConfig {
    pub fn new(compiler: CompilerConfig, include: IncludeConfig) -> Self {
        Self { compiler, include }
    }

    /// Returns the compiler configuration.
    pub fn compiler(&self) -> &CompilerConfig {
        &self.compiler
    }

    /// Returns the include configuration.
    pub fn include(&self) -> &IncludeConfig {
        &self.include
    }
}

/// Options passed to the compiler pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompilerConfig {
    /// Parse the text of `<text>` elements as GemMD.
    #[serde(default)]
    inline_markdown: bool,
}

impl CompilerConfig {
    pub fn new(inline_markdown: bool) -> Self {
        Self { inline_markdown }
    }

    pub fn inline_markdown(&self) -> bool {
        self.inline_markdown
    }

    /// Converts this section into the parser's [`CompileConfig`].
    pub fn compile_config(&self) -> CompileConfig {
        CompileConfig::default().with_inline_markdown(self.inline_markdown)
    }
}

/// Include path resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncludeConfig {
    /// Directory include paths are relative to. When unset, paths are
    /// relative to the directory of the compiled file.
    #[serde(default)]
    root: Option<PathBuf>,
}

impl IncludeConfig {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}
