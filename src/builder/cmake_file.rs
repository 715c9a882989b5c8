//! In-memory model of the generated CMake target description.
//!
//! A `CMakeFile` is filled in a single configuration pass and then rendered
//! once. All operations only touch memory except [`CMakeFile::add_source_dir`],
//! which checks that the directory exists, and [`CMakeFile::save`].

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::builder::emit;
use crate::builder::errors::BuildFileError;
use crate::core::dependency::CpmDependency;
use crate::core::library_type::LibraryType;
use crate::core::roots::ProjectRoots;
use crate::core::visibility::Visibility;
use crate::util::fs::write_atomic;

/// Default extension globbed for directory sources.
pub const DEFAULT_SOURCE_EXTENSION: &str = "cpp";

/// A registered preprocessor definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub value: Option<String>,
    pub visibility: Visibility,
}

/// A registered source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Absolute, normalized path; for globs the file name holds the pattern
    pub path: PathBuf,
    pub recursive: bool,
}

impl SourceEntry {
    /// Whether the entry expands to a set of files.
    pub fn is_glob(&self) -> bool {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().contains('*'))
            .unwrap_or(false)
    }
}

/// A compile option for this or another target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOption {
    /// `None` means the project's own target
    pub target: Option<String>,
    pub option: String,
    pub visibility: Visibility,
}

/// Builder for the generated CMake file.
#[derive(Debug, Clone)]
pub struct CMakeFile {
    roots: ProjectRoots,
    source_extension: String,
    library_type: LibraryType,
    vars: IndexMap<String, String>,
    defs: IndexMap<String, Definition>,
    include_dirs: Vec<(PathBuf, Visibility)>,
    libs: Vec<(String, Visibility)>,
    messages: Vec<String>,
    sources: Vec<SourceEntry>,
    deps: Vec<CpmDependency>,
    options: Vec<CompileOption>,
}

impl CMakeFile {
    /// Create an empty description rooted at the given directories.
    pub fn new(roots: ProjectRoots) -> Self {
        CMakeFile {
            roots,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            library_type: LibraryType::default(),
            vars: IndexMap::new(),
            defs: IndexMap::new(),
            include_dirs: Vec::new(),
            libs: Vec::new(),
            messages: Vec::new(),
            sources: Vec::new(),
            deps: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Set the extension globbed for directory sources.
    pub fn with_source_extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        self.source_extension = ext.trim_start_matches('.').to_string();
        self
    }

    /// Set the kind of library declared.
    pub fn with_library_type(mut self, library_type: LibraryType) -> Self {
        self.library_type = library_type;
        self
    }

    /// Set a CMake variable. A later call with the same name wins.
    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        debug_assert!(!name.is_empty(), "variable name must not be empty");
        self.vars.insert(name, value.into());
    }

    /// Add a preprocessor definition. A later call with the same name wins.
    pub fn add_definition(
        &mut self,
        name: impl Into<String>,
        value: Option<String>,
        visibility: Visibility,
    ) {
        self.defs
            .insert(name.into(), Definition { value, visibility });
    }

    /// Link a library by name or path.
    pub fn add_library(&mut self, name: impl Into<String>, visibility: Visibility) {
        self.libs.push((name.into(), visibility));
    }

    /// Link several libraries with the same scope.
    pub fn add_libraries<I, S>(&mut self, names: I, visibility: Visibility)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add_library(name, visibility);
        }
    }

    /// Add a `message(STATUS ...)` line.
    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Register a source file, glob, or directory.
    ///
    /// A directory becomes a glob over `*.<ext>` inside it. The parent of the
    /// resulting path must exist; otherwise nothing is registered.
    pub fn add_source_dir(
        &mut self,
        path: impl AsRef<Path>,
        recursive: bool,
    ) -> Result<(), BuildFileError> {
        let mut path = self.roots.resolve(path.as_ref());

        if path.is_dir() {
            path = path.join(format!("*.{}", self.source_extension));
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                return Err(BuildFileError::SourceDirNotFound {
                    path: parent.to_path_buf(),
                });
            }
        }

        let entry = SourceEntry { path, recursive };
        if !entry.is_glob() && !entry.path.exists() {
            tracing::warn!("source file {} does not exist", entry.path.display());
        }

        tracing::debug!("source: {} (recursive: {})", entry.path.display(), recursive);
        self.sources.push(entry);
        Ok(())
    }

    /// Add an include directory.
    pub fn add_include_dir(&mut self, path: impl Into<PathBuf>, visibility: Visibility) {
        self.include_dirs.push((path.into(), visibility));
    }

    /// Add a compile option; `target` of `None` means the project target.
    pub fn add_compile_option(
        &mut self,
        target: Option<String>,
        option: impl Into<String>,
        visibility: Visibility,
    ) {
        self.options.push(CompileOption {
            target,
            option: option.into(),
            visibility,
        });
    }

    /// Register a CPM package and link against it.
    ///
    /// The linked name is `link_name` when given, the package name otherwise.
    pub fn add_dependency(&mut self, dep: CpmDependency, link_name: Option<String>) {
        let link = link_name.unwrap_or_else(|| dep.name.clone());
        self.add_library(link, dep.link_visibility);
        self.deps.push(dep);
    }

    /// Render a path relative to the project roots.
    pub fn convert_path(&self, path: &Path) -> String {
        self.roots.convert_path(path)
    }

    pub fn roots(&self) -> &ProjectRoots {
        &self.roots
    }

    pub fn library_type(&self) -> LibraryType {
        self.library_type
    }

    pub fn variables(&self) -> &IndexMap<String, String> {
        &self.vars
    }

    pub fn definitions(&self) -> &IndexMap<String, Definition> {
        &self.defs
    }

    pub fn include_dirs(&self) -> &[(PathBuf, Visibility)] {
        &self.include_dirs
    }

    pub fn libraries(&self) -> &[(String, Visibility)] {
        &self.libs
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn sources(&self) -> &[SourceEntry] {
        &self.sources
    }

    pub fn dependencies(&self) -> &[CpmDependency] {
        &self.deps
    }

    pub fn compile_options(&self) -> &[CompileOption] {
        &self.options
    }

    /// Produce the file contents.
    pub fn render(&self) -> Result<String, BuildFileError> {
        emit::render(self)
    }

    /// Render and write the file, replacing any existing one.
    ///
    /// Rendering happens before the file is touched, so a render failure
    /// leaves the previous file in place.
    pub fn save(&self, path: &Path) -> Result<(), BuildFileError> {
        let contents = self.render()?;

        write_atomic(path, &contents).map_err(|source| BuildFileError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("wrote {} ({} bytes)", path.display(), contents.len());
        Ok(())
    }
}
