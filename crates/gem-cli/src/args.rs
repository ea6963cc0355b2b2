//! Command-line argument definitions for the Gem CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`].

use std::path::PathBuf;

use clap::Parser;

/// Compile a GemXML document and print its scene graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input GemXML file
    #[arg(help = "Path to the input file")]
    pub input: PathBuf,

    /// Write the scene dump here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Parse `<text>` content as GemMD, overriding the configuration file
    #[arg(long)]
    pub inline_markdown: bool,
}
