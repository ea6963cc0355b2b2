//! CLI logic for the Gem compiler.
//!
//! Reads a GemXML file, compiles it and writes the scene tree dump to
//! stdout or a file.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::ConfigError;

use std::{
    fs,
    io::{self, Write},
};

use log::info;
use thiserror::Error;

use gem::{
    GemBuilder, GemError,
    config::{AppConfig, CompilerConfig},
};

/// Everything that can stop the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Gem(#[from] GemError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Run the Gem CLI application
///
/// # Errors
///
/// Returns `CliError` for:
/// - Configuration loading errors
/// - Input file I/O errors
/// - Compile errors, with the document source attached
/// - Output write errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path:% = args.input.display(),
        inline_markdown = args.inline_markdown;
        "Compiling document"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.inline_markdown {
        app_config = AppConfig::new(CompilerConfig::new(true), app_config.include().clone());
    }

    let builder = GemBuilder::new(app_config);
    let scene = builder.compile_file(&args.input)?;
    let dump = scene.to_string();

    match &args.output {
        Some(path) => {
            fs::write(path, &dump)?;
            info!(output_file:% = path.display(); "Scene written");
        }
        None => io::stdout().lock().write_all(dump.as_bytes())?,
    }

    Ok(())
}
