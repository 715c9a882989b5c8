//! External packages fetched through CPM.
//!
//! A dependency names a repository and a revision; the generated file hands
//! both to `CPMAddPackage`, which clones and configures the package as part of
//! the consuming project's CMake run.

use indexmap::IndexMap;

use crate::core::visibility::Visibility;

/// Host used for `owner/repo` shorthand repositories.
pub const DEFAULT_GIT_HOST: &str = "https://github.com";

/// A package fetched by CPM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpmDependency {
    /// Package name as CPM knows it
    pub name: String,
    /// Full URL or `owner/repo` shorthand
    pub repo: String,
    /// Tag, branch or commit
    pub tag: String,
    /// Cache options forwarded to the package's configure step
    pub options: IndexMap<String, String>,
    /// Scope of the implied link library
    pub link_visibility: Visibility,
}

impl CpmDependency {
    /// Create a dependency with no options and private linkage.
    pub fn new(name: impl Into<String>, repo: impl Into<String>, tag: impl Into<String>) -> Self {
        CpmDependency {
            name: name.into(),
            repo: repo.into(),
            tag: tag.into(),
            options: IndexMap::new(),
            link_visibility: Visibility::Private,
        }
    }

    /// Add a configure option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Set the scope of the implied link library.
    pub fn with_link_visibility(mut self, visibility: Visibility) -> Self {
        self.link_visibility = visibility;
        self
    }

    /// The clone URL.
    ///
    /// Anything starting with `http` is used as-is; shorthand is expanded to
    /// a GitHub URL.
    pub fn repository_url(&self) -> String {
        if self.repo.starts_with("http") {
            self.repo.clone()
        } else {
            format!("{}/{}.git", DEFAULT_GIT_HOST, self.repo)
        }
    }
}
