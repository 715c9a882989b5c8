//! Path classification against the build and source roots.
//!
//! Paths written into the generated CMake file are rendered relative to one
//! of two known roots so the file stays valid if the checkout moves:
//!
//! - under the build root: a plain relative path (CMake resolves it against
//!   the binary directory)
//! - under the source root: `${CMAKE_CURRENT_SOURCE_DIR}/<relative>`
//! - anywhere else: the absolute path
//!
//! The build root is checked first because build directories are commonly
//! nested inside the source tree.

use std::path::{Path, PathBuf};

use crate::util::fs::{is_inside, normalize_lexically, relative_path};

/// CMake variable that expands to the directory of the including list file.
pub const SOURCE_DIR_VAR: &str = "${CMAKE_CURRENT_SOURCE_DIR}";

/// The two base directories used when rendering paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoots {
    source_dir: PathBuf,
    build_dir: PathBuf,
}

/// Where a path lives relative to the project roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathClass {
    /// Relative suffix under the build root
    Build(PathBuf),
    /// Relative suffix under the source root
    Source(PathBuf),
    /// Outside both roots
    Absolute(PathBuf),
}

impl ProjectRoots {
    /// Create roots from a source and build directory.
    ///
    /// A relative build directory is taken relative to the source directory.
    pub fn new(source_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        let source_dir = normalize_lexically(&source_dir.into());
        let build_dir = build_dir.into();
        let build_dir = if build_dir.is_relative() {
            normalize_lexically(&source_dir.join(build_dir))
        } else {
            normalize_lexically(&build_dir)
        };

        ProjectRoots {
            source_dir,
            build_dir,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Anchor a path at the source root and strip `.`/`..` components.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            normalize_lexically(&self.source_dir.join(path))
        } else {
            normalize_lexically(path)
        }
    }

    /// Classify a path against the roots, build root first.
    pub fn classify(&self, path: &Path) -> PathClass {
        let path = self.resolve(path);

        if is_inside(&path, &self.build_dir) {
            PathClass::Build(relative_path(&self.build_dir, &path))
        } else if is_inside(&path, &self.source_dir) {
            PathClass::Source(relative_path(&self.source_dir, &path))
        } else {
            PathClass::Absolute(path)
        }
    }

    /// Render a path as a quoted CMake string.
    pub fn convert_path(&self, path: &Path) -> String {
        match self.classify(path) {
            PathClass::Build(rel) => format!("\"{}\"", to_slash(&rel)),
            PathClass::Source(rel) => format!("\"{}/{}\"", SOURCE_DIR_VAR, to_slash(&rel)),
            PathClass::Absolute(abs) => format!("\"{}\"", to_slash(&abs)),
        }
    }
}

/// Render a path with forward slashes; an empty path renders as `.`.
fn to_slash(path: &Path) -> String {
    let rendered = path.to_string_lossy().replace('\\', "/");
    if rendered.is_empty() {
        ".".to_string()
    } else {
        rendered
    }
}
