//! Kind of library target the generated file declares.

use std::fmt;

use serde::Deserialize;

/// Argument to `add_library`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryType {
    #[default]
    Shared,
    Static,
    Module,
}

impl LibraryType {
    pub fn as_cmake(&self) -> &'static str {
        match self {
            LibraryType::Shared => "SHARED",
            LibraryType::Static => "STATIC",
            LibraryType::Module => "MODULE",
        }
    }
}

impl fmt::Display for LibraryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cmake())
    }
}
