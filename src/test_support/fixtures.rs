//! Test fixtures for common test scenarios.

use std::path::{Path, PathBuf};

use crate::core::MANIFEST_NAME;

/// Fixture for a project tree with a `Prebuild.toml`.
#[derive(Debug, Clone, Default)]
pub struct ProjectFixture {
    /// Prebuild.toml content; no manifest is written when `None`.
    pub manifest: Option<String>,
    /// Directories to create (relative to the project root).
    pub dirs: Vec<PathBuf>,
    /// Files to create (relative path -> content).
    pub files: Vec<(PathBuf, String)>,
}

impl ProjectFixture {
    /// Create a new empty project fixture.
    pub fn new() -> Self {
        ProjectFixture::default()
    }

    /// A project with `src/core` and a manifest that globs it.
    pub fn minimal() -> Self {
        ProjectFixture::new()
            .with_manifest(manifests::sources(&["src/core"]))
            .with_dirs(["src/core"])
            .with_file("src/core/main.cpp", sources::EMPTY_CPP)
    }

    /// Set the manifest content.
    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    /// Add directories.
    pub fn with_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Add a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Write this fixture into an existing directory.
    pub fn write_to(&self, root: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(root)?;

        if let Some(ref manifest) = self.manifest {
            std::fs::write(root.join(MANIFEST_NAME), manifest)?;
        }

        for dir in &self.dirs {
            std::fs::create_dir_all(root.join(dir))?;
        }

        for (rel_path, content) in &self.files {
            let full_path = root.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        Ok(root.to_path_buf())
    }
}

/// Common manifest templates.
pub mod manifests {
    /// A manifest listing source directories only.
    pub fn sources(dirs: &[&str]) -> String {
        let list: Vec<String> = dirs.iter().map(|d| format!("\"{}\"", d)).collect();
        format!("sources = [{}]\n", list.join(", "))
    }
}

/// Common source file contents.
pub mod sources {
    pub const EMPTY_CPP: &str = "// empty translation unit\n";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Manifest;
    use tempfile::TempDir;

    #[test]
    fn test_minimal_fixture() {
        let tmp = TempDir::new().unwrap();
        let root = ProjectFixture::minimal().write_to(tmp.path()).unwrap();

        assert!(root.join("src/core/main.cpp").is_file());
        let manifest = Manifest::load(&root.join(MANIFEST_NAME)).unwrap();
        assert_eq!(manifest.content.sources[0].path(), "src/core");
    }
}
