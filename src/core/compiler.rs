//! Compiler identity as reported by CMake.

/// Compiler identification passed in from the CMake configure step
/// (`CMAKE_CXX_COMPILER_ID`, `CMAKE_CXX_COMPILER_FRONTEND_VARIANT`,
/// `CMAKE_CXX_COMPILER_VERSION`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerInfo {
    pub id: String,
    pub frontend: String,
    pub version: String,
}

impl CompilerInfo {
    pub fn new(
        id: impl Into<String>,
        frontend: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        CompilerInfo {
            id: id.into(),
            frontend: frontend.into(),
            version: version.into(),
        }
    }

    /// Any clang flavour, including AppleClang and clang-cl.
    pub fn is_clang(&self) -> bool {
        self.id.to_lowercase().contains("clang")
    }

    /// Clang driven through the MSVC-compatible frontend.
    pub fn is_clang_cl(&self) -> bool {
        self.is_clang() && self.frontend == "MSVC"
    }

    /// Compiler family name used by manifest conditions.
    pub fn family(&self) -> &'static str {
        if self.is_clang_cl() {
            "clang-cl"
        } else if self.is_clang() {
            "clang"
        } else if self.id.eq_ignore_ascii_case("msvc") {
            "msvc"
        } else if self.id.eq_ignore_ascii_case("gnu") {
            "gcc"
        } else {
            "unknown"
        }
    }

    /// Flag that disables all warnings for this compiler.
    pub fn silence_warnings_flag(&self) -> &'static str {
        if self.is_clang_cl() {
            "/w"
        } else {
            "-w"
        }
    }
}
