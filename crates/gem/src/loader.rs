//! Filesystem access for `<include>` elements.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;

use gem_parser::{LoadError, Loader};

/// Loads includes from files relative to a root directory.
///
/// Absolute include paths are used as they are.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Loader for FsLoader {
    fn load(&self, path: &str) -> Result<String, LoadError> {
        let full_path = self.root.join(path);
        debug!(path:% = full_path.display(); "Reading include");

        fs::read_to_string(&full_path).map_err(|source| {
            let path = full_path.display().to_string();
            match source.kind() {
                io::ErrorKind::NotFound => LoadError::NotFound(path),
                _ => LoadError::Io { path, source },
            }
        })
    }
}
