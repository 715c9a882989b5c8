//! `Prebuild.toml` manifest parsing and schema.
//!
//! The manifest declares what goes into the generated CMake file. Top-level
//! content always applies; `[[when]]` blocks carry the same content keys and
//! apply only when their condition matches the configure-time inputs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::builder::cmake_file::DEFAULT_SOURCE_EXTENSION;
use crate::core::condition::Condition;
use crate::core::library_type::LibraryType;
use crate::core::visibility::Visibility;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Prebuild.toml";

/// The parsed manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Project-wide settings
    #[serde(default)]
    pub project: ProjectConfig,

    /// Unconditional content
    #[serde(flatten)]
    pub content: Content,

    /// Optional feature modules
    #[serde(default)]
    pub modules: ModulesConfig,

    /// Mod metadata generation
    #[serde(default, rename = "mod-json")]
    pub mod_json: Option<ModJsonConfig>,

    /// Conditional content, applied in file order
    #[serde(default, rename = "when")]
    pub conditionals: Vec<ConditionalContent>,

    /// Keys no other field claimed; rejected by [`Manifest::parse`]
    #[serde(flatten)]
    pub unknown: IndexMap<String, toml::Value>,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Display name used in logs and error messages
    pub name: Option<String>,

    /// Extension globbed for directory sources
    pub source_extension: String,

    /// Kind of library declared
    pub library_type: LibraryType,

    /// Reject every compiler except clang with a GNU-style frontend
    pub require_clang: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            name: None,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            library_type: LibraryType::default(),
            require_clang: false,
        }
    }
}

impl ProjectConfig {
    /// Name for display, falling back to `project`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("project")
    }
}

/// Everything that can be contributed to the generated file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Content {
    pub messages: Vec<String>,
    pub variables: IndexMap<String, String>,
    pub sources: Vec<SourceSpec>,
    pub include_dirs: Vec<IncludeSpec>,
    pub definitions: IndexMap<String, DefinitionSpec>,
    pub libraries: Vec<LibrarySpec>,
    pub compile_options: Vec<CompileOptionSpec>,
    pub dependencies: IndexMap<String, DependencySpec>,
    /// Targets whose warnings are disabled
    pub silence_warnings: Vec<String>,
    /// Entries merged into the mod metadata `dependencies` object
    pub mod_dependencies: IndexMap<String, String>,
}

/// A `[[when]]` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionalContent {
    #[serde(flatten)]
    pub condition: Condition,

    #[serde(flatten)]
    pub content: Content,

    #[serde(flatten)]
    pub unknown: IndexMap<String, toml::Value>,
}

/// A source entry: `"src/core"` or `{ path = "src/core", recursive = false }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    Path(String),
    Detailed {
        path: String,
        #[serde(default = "default_true")]
        recursive: bool,
    },
}

impl SourceSpec {
    pub fn path(&self) -> &str {
        match self {
            SourceSpec::Path(p) => p,
            SourceSpec::Detailed { path, .. } => path,
        }
    }

    pub fn recursive(&self) -> bool {
        match self {
            SourceSpec::Path(_) => true,
            SourceSpec::Detailed { recursive, .. } => *recursive,
        }
    }
}

/// An include directory: `"src"` or `{ path = "include", visibility = "public" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IncludeSpec {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        visibility: Visibility,
    },
}

impl IncludeSpec {
    pub fn path(&self) -> &str {
        match self {
            IncludeSpec::Path(p) => p,
            IncludeSpec::Detailed { path, .. } => path,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            IncludeSpec::Path(_) => Visibility::Private,
            IncludeSpec::Detailed { visibility, .. } => *visibility,
        }
    }
}

/// A definition value.
///
/// `true` defines the bare name, `false` skips it, a string sets the value,
/// and a table may also set the visibility.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DefinitionSpec {
    Flag(bool),
    Value(String),
    Detailed {
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        visibility: Visibility,
    },
}

impl DefinitionSpec {
    /// Value and scope, or `None` when the definition is switched off.
    pub fn resolve(&self) -> Option<(Option<&str>, Visibility)> {
        match self {
            DefinitionSpec::Flag(false) => None,
            DefinitionSpec::Flag(true) => Some((None, Visibility::Private)),
            DefinitionSpec::Value(v) => Some((Some(v), Visibility::Private)),
            DefinitionSpec::Detailed { value, visibility } => {
                Some((value.as_deref(), *visibility))
            }
        }
    }
}

/// A link library: `"ntdll.lib"` or `{ name = "asp", visibility = "public" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LibrarySpec {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        visibility: Visibility,
    },
}

impl LibrarySpec {
    pub fn name(&self) -> &str {
        match self {
            LibrarySpec::Name(n) => n,
            LibrarySpec::Detailed { name, .. } => name,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            LibrarySpec::Name(_) => Visibility::Private,
            LibrarySpec::Detailed { visibility, .. } => *visibility,
        }
    }
}

/// A compile option entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompileOptionSpec {
    /// Target name; the project target when absent
    #[serde(default)]
    pub target: Option<String>,
    pub option: String,
    #[serde(default)]
    pub visibility: Visibility,
}

/// A `[dependencies.<name>]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DependencySpec {
    /// Full URL or `owner/repo`
    pub repo: String,
    /// Tag, branch or commit
    pub tag: String,
    #[serde(default)]
    pub options: IndexMap<String, String>,
    /// Link target when it differs from the package name
    #[serde(default)]
    pub link_name: Option<String>,
    #[serde(default)]
    pub link_visibility: Visibility,
}

/// `[modules]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ModulesConfig {
    /// Directory holding one subdirectory per module
    pub dir: String,
    /// Subdirectories of `dir` searched when a module is not found directly
    pub search: Vec<String>,
    /// Modules that are always enabled
    pub enabled: Vec<String>,
    /// Prefix for the per-module definition, e.g. `GLOBED_MODULE_`
    pub definition_prefix: Option<String>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        ModulesConfig {
            dir: "src/modules".to_string(),
            search: Vec::new(),
            enabled: Vec::new(),
            definition_prefix: None,
        }
    }
}

/// `[mod-json]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModJsonConfig {
    pub template: String,
    pub output: String,
}

impl Default for ModJsonConfig {
    fn default() -> Self {
        ModJsonConfig {
            template: "mod.json.template".to_string(),
            output: "mod.json".to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Manifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse manifest text.
    ///
    /// Unknown keys and empty variable or definition names are rejected, so
    /// a misspelled `[[when]]` key cannot turn into an always-true block.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(contents)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check for unknown keys and empty names.
    pub fn validate(&self) -> Result<()> {
        if let Some(key) = self.unknown.keys().next() {
            bail!("unknown manifest key `{}`", key);
        }
        self.content.validate().context("invalid top-level content")?;

        for (i, block) in self.conditionals.iter().enumerate() {
            if let Some(key) = block.unknown.keys().next() {
                bail!("unknown key `{}` in [[when]] block #{}", key, i + 1);
            }
            block
                .content
                .validate()
                .with_context(|| format!("invalid [[when]] block #{}", i + 1))?;
        }
        Ok(())
    }
}

impl Content {
    fn validate(&self) -> Result<()> {
        if self.variables.keys().any(|k| k.trim().is_empty()) {
            bail!("variable name must not be empty");
        }
        if self.definitions.keys().any(|k| k.trim().is_empty()) {
            bail!("definition name must not be empty");
        }
        Ok(())
    }
}

/// Locate the manifest in a directory.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(MANIFEST_NAME);
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
messages = ["configuring"]
sources = ["src/core", { path = "src/platform/{platform}", recursive = false }]
include-dirs = [{ path = "include", visibility = "public" }, "src"]
libraries = ["libs/bb/bb.lib", { name = "asp", visibility = "PUBLIC" }]
compile-options = [{ target = "kj", option = "-w" }, { option = "-Wall" }]
silence-warnings = ["capnp"]

[project]
name = "globed"
source-extension = "cc"
library-type = "static"
require-clang = true

[variables]
CMAKE_INTERPROCEDURAL_OPTIMIZATION = "ON"

[definitions]
GLOBED_BUILD = true
GLOBED_DISABLED = false
UIBUILDER_NO_ARROW = "1"
GLOBED_VOICE_SUPPORT = { value = "1", visibility = "public" }

[dependencies.capnproto]
repo = "capnproto/capnproto"
tag = "v1.2.0"
link-name = "CapnProto::capnp"
options = { CAPNP_LITE = "ON", BUILD_TESTING = "OFF" }

[dependencies.argon]
repo = "GlobedGD/argon"
tag = "v1.2.0"

[modules]
dir = "src/modules"
search = ["comm"]
enabled = ["deathlink"]
definition-prefix = "GLOBED_MODULE_"

[mod-json]

[[when]]
debug = true
definitions = { GLOBED_DEBUG = "1" }
variables = { QUNET_DEBUG = "ON" }

[[when]]
platform = "windows"
module = "voice"
libraries = ["ntdll.lib"]
mod-dependencies = { "alphalaneous.editortab_api" = ">=1.0.17" }
"#;

    #[test]
    fn test_parse_full_manifest() {
        let m = Manifest::parse(FULL).unwrap();

        assert_eq!(m.project.display_name(), "globed");
        assert_eq!(m.project.source_extension, "cc");
        assert_eq!(m.project.library_type, LibraryType::Static);
        assert!(m.project.require_clang);

        assert_eq!(m.content.messages, ["configuring"]);
        assert_eq!(m.content.sources.len(), 2);
        assert!(m.content.sources[0].recursive());
        assert!(!m.content.sources[1].recursive());
        assert_eq!(m.content.sources[1].path(), "src/platform/{platform}");

        assert_eq!(m.content.include_dirs[0].visibility(), Visibility::Public);
        assert_eq!(m.content.include_dirs[1].visibility(), Visibility::Private);
        assert_eq!(m.content.libraries[1].visibility(), Visibility::Public);
        assert_eq!(m.content.compile_options[0].target.as_deref(), Some("kj"));
        assert_eq!(m.content.compile_options[1].target, None);
    }

    #[test]
    fn test_definitions_preserve_order() {
        let m = Manifest::parse(FULL).unwrap();
        let names: Vec<&str> = m.content.definitions.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            [
                "GLOBED_BUILD",
                "GLOBED_DISABLED",
                "UIBUILDER_NO_ARROW",
                "GLOBED_VOICE_SUPPORT"
            ]
        );

        let defs = &m.content.definitions;
        assert_eq!(defs["GLOBED_BUILD"].resolve(), Some((None, Visibility::Private)));
        assert_eq!(defs["GLOBED_DISABLED"].resolve(), None);
        assert_eq!(
            defs["GLOBED_VOICE_SUPPORT"].resolve(),
            Some((Some("1"), Visibility::Public))
        );
    }

    #[test]
    fn test_dependencies() {
        let m = Manifest::parse(FULL).unwrap();
        let names: Vec<&str> = m.content.dependencies.keys().map(String::as_str).collect();
        assert_eq!(names, ["capnproto", "argon"]);

        let capnp = &m.content.dependencies["capnproto"];
        assert_eq!(capnp.link_name.as_deref(), Some("CapnProto::capnp"));
        let opts: Vec<&str> = capnp.options.keys().map(String::as_str).collect();
        assert_eq!(opts, ["CAPNP_LITE", "BUILD_TESTING"]);
        assert_eq!(m.content.dependencies["argon"].link_visibility, Visibility::Private);
    }

    #[test]
    fn test_modules_and_mod_json() {
        let m = Manifest::parse(FULL).unwrap();
        assert_eq!(m.modules.search, ["comm"]);
        assert_eq!(m.modules.definition_prefix.as_deref(), Some("GLOBED_MODULE_"));

        let mod_json = m.mod_json.unwrap();
        assert_eq!(mod_json.template, "mod.json.template");
        assert_eq!(mod_json.output, "mod.json");
    }

    #[test]
    fn test_conditionals() {
        let m = Manifest::parse(FULL).unwrap();
        assert_eq!(m.conditionals.len(), 2);

        let debug = &m.conditionals[0];
        assert_eq!(debug.condition.debug, Some(true));
        assert!(debug.content.definitions.contains_key("GLOBED_DEBUG"));

        let windows = &m.conditionals[1];
        assert_eq!(windows.condition.platform.as_deref(), Some("windows"));
        assert_eq!(windows.condition.module.as_deref(), Some("voice"));
        assert_eq!(windows.content.libraries[0].name(), "ntdll.lib");
        assert_eq!(
            windows.content.mod_dependencies["alphalaneous.editortab_api"],
            ">=1.0.17"
        );
    }

    #[test]
    fn test_empty_manifest_defaults() {
        let m = Manifest::parse("").unwrap();
        assert_eq!(m.project.source_extension, "cpp");
        assert_eq!(m.project.library_type, LibraryType::Shared);
        assert_eq!(m.modules.dir, "src/modules");
        assert!(m.mod_json.is_none());
        assert!(m.conditionals.is_empty());
    }

    #[test]
    fn test_misspelled_condition_key_rejected() {
        let err = Manifest::parse(
            r#"
[[when]]
platfom = "windows"
libraries = ["ntdll.lib"]
"#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("unknown key `platfom` in [[when]] block #1"));
    }

    #[test]
    fn test_misspelled_content_key_rejected() {
        let err = Manifest::parse(r#"include-dir = ["include"]"#).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown manifest key `include-dir`"));

        let err = Manifest::parse(
            r#"
[dependencies.fmt]
repo = "fmtlib/fmt"
tag = "11.0.2"
link = "fmt::fmt"
"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_variable_name_rejected() {
        let err = Manifest::parse(r#"variables = { "" = "x" }"#).unwrap_err();
        assert!(format!("{:#}", err).contains("variable name must not be empty"));

        let err = Manifest::parse(
            r#"
[[when]]
debug = true
definitions = { " " = "1" }
"#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("definition name must not be empty"));
    }

    #[test]
    fn test_invalid_visibility_rejected() {
        let err = Manifest::parse(r#"include-dirs = [{ path = "x", visibility = "interface" }]"#);
        assert!(err.is_err());
    }
}
