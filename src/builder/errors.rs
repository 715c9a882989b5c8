//! Errors raised while building or writing a CMake description.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error while assembling or saving a [`CMakeFile`](super::CMakeFile).
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BuildFileError {
    #[error("source directory {} does not exist", path.display())]
    #[diagnostic(
        code(prebuild::sources::not_found),
        help("Create the directory or remove it from the source list")
    )]
    SourceDirNotFound { path: PathBuf },

    #[error("duplicate source path: {pattern}")]
    #[diagnostic(code(prebuild::sources::duplicate_glob))]
    DuplicateSourceGlob { pattern: String, identifier: String },

    #[error("failed to write {}", path.display())]
    #[diagnostic(code(prebuild::io::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildFileError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BuildFileError::SourceDirNotFound { path } => {
                Diagnostic::error(format!("Source directory {} does not exist", path.display()))
                    .with_suggestion("Create the directory or remove it from `sources`")
            }

            BuildFileError::DuplicateSourceGlob {
                pattern,
                identifier,
            } => Diagnostic::error(format!("Duplicate source path: {}", pattern))
                .with_context(format!("generated variable `{}` is already in use", identifier))
                .with_suggestion("Register each source directory only once"),

            BuildFileError::Write { path, source } => {
                Diagnostic::error(format!("Failed to write {}", path.display()))
                    .with_context(source.to_string())
                    .with_location(path.clone())
            }
        }
    }
}
