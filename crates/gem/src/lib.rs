//! Gem - a markup, style and rich-text language compiled to a scene graph.
//!
//! Documents are written in GemXML, styled with GemSheet and may pull rich
//! text from GemMD files. [`GemBuilder`] runs the whole compile and returns
//! the root [`SceneNode`](scene::SceneNode) for a renderer to draw.

pub mod config;

mod error;
mod loader;

pub use gem_core::{color, geometry, identifier, scene, text};

pub use error::GemError;
pub use gem_parser::{CompileError, LoadError, Loader};
pub use loader::FsLoader;

use std::{fs, path::Path};

use log::{debug, info, trace};

use config::AppConfig;
use scene::SceneNode;

/// Builder for compiling Gem documents.
///
/// # Examples
///
/// ```rust
/// use gem::{GemBuilder, LoadError, config::AppConfig};
///
/// let builder = GemBuilder::new(AppConfig::default());
/// let no_includes =
///     |path: &str| -> Result<String, LoadError> { Err(LoadError::NotFound(path.to_string())) };
///
/// let scene = builder
///     .compile(r#"<window title="Hi"><rect/></window>"#, &no_includes)
///     .expect("Failed to compile");
/// assert_eq!(scene.children().len(), 1);
/// ```
#[derive(Default)]
pub struct GemBuilder {
    config: AppConfig,
}

impl GemBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Compile GemXML source into a scene graph.
    ///
    /// Includes are fetched through `loader`.
    ///
    /// # Errors
    ///
    /// Returns [`GemError::Compile`] with the source attached when any
    /// compile stage fails.
    pub fn compile(&self, source: &str, loader: &dyn Loader) -> Result<SceneNode, GemError> {
        info!("Compiling document");
        trace!(source; "Document source");

        let compile_config = self.config.compiler().compile_config();
        let scene = gem_parser::compile(source, loader, &compile_config)
            .map_err(|err| GemError::new_compile_error(err, source))?;

        debug!(nodes = scene.iter().count(); "Document compiled successfully");
        Ok(scene)
    }

    /// Read and compile a GemXML file.
    ///
    /// Includes are loaded with an [`FsLoader`] rooted at the configured
    /// include root, or at the directory containing `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GemError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`GemBuilder::compile`].
    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<SceneNode, GemError> {
        let path = path.as_ref();
        info!(path:% = path.display(); "Reading document");
        let source = fs::read_to_string(path)?;

        let root = match self.config.include().root() {
            Some(root) => root.to_path_buf(),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        debug!(root:% = root.display(); "Resolving includes from directory");

        self.compile(&source, &FsLoader::new(root))
    }
}
