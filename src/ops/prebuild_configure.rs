//! Implementation of `prebuild configure`.
//!
//! One configuration pass: read the manifest, check the toolchain, feed the
//! manifest content into a [`CMakeFile`] and write the outputs. Any error
//! stops the pass before the CMake file is written.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::builder::{BuildFileError, CMakeFile};
use crate::core::manifest::{Content, ModulesConfig, ProjectConfig};
use crate::core::{
    CompilerInfo, ConditionContext, CpmDependency, Manifest, Placeholders, Platform,
    ProjectRoots, Visibility,
};
use crate::ops::mod_json::generate_mod_json;
use crate::util::diagnostic::Diagnostic;
use crate::util::fs::{ensure_dir, write_atomic};

/// Error specific to the configuration pass.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConfigureError {
    #[error("Clang-cl and MSVC are not supported, {project} can only be built with Clang")]
    #[diagnostic(code(prebuild::toolchain::unsupported))]
    UnsupportedCompiler { project: String, compiler: String },

    #[error("Failed to find sources for module '{module}'")]
    #[diagnostic(code(prebuild::modules::not_found))]
    ModuleNotFound {
        module: String,
        searched: Vec<PathBuf>,
    },
}

impl ConfigureError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigureError::UnsupportedCompiler { compiler, .. } => {
                Diagnostic::error(self.to_string())
                    .with_context(format!("detected compiler: {}", compiler))
                    .with_suggestion("Configure with a clang toolchain using the GNU frontend")
            }
            ConfigureError::ModuleNotFound { searched, .. } => {
                let mut diag = Diagnostic::error(self.to_string());
                for path in searched {
                    diag = diag.with_context(format!("searched {}", path.display()));
                }
                diag.with_suggestion("Check the module name or `[modules] search` in Prebuild.toml")
            }
        }
    }
}

/// Inputs for one configuration pass.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    /// Path to `Prebuild.toml`
    pub manifest_path: PathBuf,

    /// Project source root (absolute)
    pub source_dir: PathBuf,

    /// CMake binary directory (absolute)
    pub build_dir: PathBuf,

    /// Where to write the CMake file; `None` skips writing
    pub output_file: Option<PathBuf>,

    pub platform: Platform,
    pub debug: bool,
    pub release: bool,

    /// Modules enabled on the command line, after those in the manifest
    pub modules: Vec<String>,

    /// `--param` values, usable as placeholders and in conditions
    pub params: IndexMap<String, String>,

    pub compiler: CompilerInfo,
}

/// Everything a pass produced.
#[derive(Debug, Clone)]
pub struct ConfigurePlan {
    pub cmake: CMakeFile,
    /// Final module list, manifest modules first
    pub modules: Vec<String>,
    /// Entries for the mod metadata `dependencies` object
    pub mod_dependencies: IndexMap<String, String>,
}

/// Outcome of [`configure`].
#[derive(Debug)]
pub struct ConfigureResult {
    pub plan: ConfigurePlan,
    /// CMake file written, if any
    pub output_file: Option<PathBuf>,
    /// Mod metadata written, if any
    pub mod_json: Option<PathBuf>,
    pub elapsed: Duration,
}

/// Run a configuration pass and write its outputs.
pub fn configure(opts: &ConfigureOptions) -> Result<ConfigureResult> {
    let start = Instant::now();
    let manifest = Manifest::load(&opts.manifest_path)?;

    let plan = plan(&manifest, opts)?;

    // Nothing is written unless the CMake file renders.
    let rendered = match opts.output_file {
        Some(ref output) => Some((output, plan.cmake.render()?)),
        None => None,
    };

    let mod_json = match manifest.mod_json {
        Some(ref cfg) if rendered.is_some() => {
            let template = opts.source_dir.join(&cfg.template);
            let output = opts.source_dir.join(&cfg.output);
            generate_mod_json(&template, &output, &plan.mod_dependencies)?;
            Some(output)
        }
        _ => None,
    };

    if let Some((output, text)) = rendered {
        if let Some(parent) = output.parent() {
            ensure_dir(parent)?;
        }
        write_atomic(output, &text).map_err(|source| BuildFileError::Write {
            path: output.clone(),
            source,
        })?;
        tracing::info!("Generated {}", output.display());
    }

    Ok(ConfigureResult {
        plan,
        output_file: opts.output_file.clone(),
        mod_json,
        elapsed: start.elapsed(),
    })
}

/// Build the CMake description for a manifest without writing anything.
pub fn plan(manifest: &Manifest, opts: &ConfigureOptions) -> Result<ConfigurePlan> {
    manifest.validate()?;
    let modules = enabled_modules(&manifest.modules, &opts.modules);
    log_summary(&manifest.project, opts, &modules);

    check_toolchain(&manifest.project, &opts.compiler)?;

    let placeholders = placeholders(opts);
    let roots = ProjectRoots::new(&opts.source_dir, &opts.build_dir);
    let mut cmake = CMakeFile::new(roots)
        .with_source_extension(&manifest.project.source_extension)
        .with_library_type(manifest.project.library_type);

    let mut mod_dependencies = IndexMap::new();
    let mut silenced = Vec::new();

    apply_content(
        &mut cmake,
        &manifest.content,
        &placeholders,
        &mut mod_dependencies,
        &mut silenced,
    )
    .context("failed to apply manifest content")?;

    let ctx = ConditionContext {
        platform: opts.platform,
        debug: opts.debug,
        release: opts.release,
        modules: &modules,
        params: &opts.params,
        compiler: &opts.compiler,
    };

    for (i, block) in manifest.conditionals.iter().enumerate() {
        if !block.condition.matches(&ctx) {
            tracing::debug!("skipping [[when]] block #{}", i + 1);
            continue;
        }

        tracing::debug!("applying [[when]] block #{}", i + 1);
        apply_content(
            &mut cmake,
            &block.content,
            &placeholders,
            &mut mod_dependencies,
            &mut silenced,
        )
        .with_context(|| format!("failed to apply [[when]] block #{}", i + 1))?;
    }

    apply_modules(&mut cmake, &manifest.modules, &modules)?;

    for target in silenced {
        cmake.add_compile_option(
            Some(target),
            opts.compiler.silence_warnings_flag(),
            Visibility::Private,
        );
    }

    Ok(ConfigurePlan {
        cmake,
        modules,
        mod_dependencies,
    })
}

/// Reject unsupported compilers when the project requires clang.
pub fn check_toolchain(
    project: &ProjectConfig,
    compiler: &CompilerInfo,
) -> Result<(), ConfigureError> {
    if project.require_clang && (compiler.is_clang_cl() || !compiler.is_clang()) {
        return Err(ConfigureError::UnsupportedCompiler {
            project: project.display_name().to_string(),
            compiler: format!("{} ({} frontend)", compiler.id, compiler.frontend),
        });
    }
    Ok(())
}

/// Manifest modules followed by command-line modules, without repeats.
pub fn enabled_modules(config: &ModulesConfig, extra: &[String]) -> Vec<String> {
    let mut modules: Vec<String> = Vec::new();
    for module in config.enabled.iter().chain(extra) {
        let module = module.trim();
        if !module.is_empty() && !modules.iter().any(|m| m == module) {
            modules.push(module.to_string());
        }
    }
    modules
}

/// Locate a module's source directory.
///
/// Tries `<dir>/<module>` first, then `<dir>/<search>/<module>` for each
/// search entry in order.
pub fn find_module_dir(
    source_dir: &Path,
    config: &ModulesConfig,
    module: &str,
) -> Result<PathBuf, ConfigureError> {
    let base = source_dir.join(&config.dir);
    let candidates: Vec<PathBuf> = std::iter::once(base.join(module))
        .chain(config.search.iter().map(|s| base.join(s).join(module)))
        .collect();

    match candidates.iter().find(|p| p.is_dir()) {
        Some(found) => Ok(found.clone()),
        None => Err(ConfigureError::ModuleNotFound {
            module: module.to_string(),
            searched: candidates,
        }),
    }
}

/// Definition name for a module: `two-player` with prefix `X_` is `X_TWO_PLAYER`.
pub fn module_definition(prefix: &str, module: &str) -> String {
    format!("{}{}", prefix, module.to_uppercase().replace('-', "_"))
}

fn apply_modules(
    cmake: &mut CMakeFile,
    config: &ModulesConfig,
    modules: &[String],
) -> Result<()> {
    let source_dir = cmake.roots().source_dir().to_path_buf();

    for module in modules {
        let dir = find_module_dir(&source_dir, config, module)?;
        tracing::debug!("module {} -> {}", module, dir.display());

        cmake.add_source_dir(&dir, true)?;
        if let Some(ref prefix) = config.definition_prefix {
            cmake.add_definition(
                module_definition(prefix, module),
                Some("1".to_string()),
                Visibility::Private,
            );
        }
    }

    Ok(())
}

fn apply_content(
    cmake: &mut CMakeFile,
    content: &Content,
    placeholders: &Placeholders,
    mod_dependencies: &mut IndexMap<String, String>,
    silenced: &mut Vec<String>,
) -> Result<()> {
    let expand = |s: &str| placeholders.expand(s);

    for message in &content.messages {
        cmake.add_message(expand(message.as_str())?);
    }

    for (name, value) in &content.variables {
        cmake.set_var(name.clone(), expand(value.as_str())?);
    }

    for source in &content.sources {
        cmake.add_source_dir(expand(source.path())?, source.recursive())?;
    }

    for dir in &content.include_dirs {
        cmake.add_include_dir(expand(dir.path())?, dir.visibility());
    }

    for (name, spec) in &content.definitions {
        if let Some((value, visibility)) = spec.resolve() {
            let value = value.map(expand).transpose()?;
            cmake.add_definition(name.clone(), value, visibility);
        }
    }

    for lib in &content.libraries {
        cmake.add_library(expand(lib.name())?, lib.visibility());
    }

    for opt in &content.compile_options {
        let target = opt.target.as_deref().map(expand).transpose()?;
        cmake.add_compile_option(target, expand(opt.option.as_str())?, opt.visibility);
    }

    for (name, spec) in &content.dependencies {
        let mut dep = CpmDependency::new(
            name.clone(),
            expand(spec.repo.as_str())?,
            expand(spec.tag.as_str())?,
        )
        .with_link_visibility(spec.link_visibility);
        for (key, value) in &spec.options {
            dep = dep.with_option(key.clone(), expand(value.as_str())?);
        }
        let link_name = spec.link_name.as_deref().map(expand).transpose()?;
        cmake.add_dependency(dep, link_name);
    }

    for target in &content.silence_warnings {
        silenced.push(expand(target.as_str())?);
    }

    for (key, version) in &content.mod_dependencies {
        mod_dependencies.insert(key.clone(), expand(version.as_str())?);
    }

    Ok(())
}

fn placeholders(opts: &ConfigureOptions) -> Placeholders {
    let mut p = Placeholders::new();
    for (key, value) in &opts.params {
        p.insert(key.clone(), value.clone());
    }
    p.insert("platform", opts.platform.as_str(false));
    p.insert("platform-bits", opts.platform.as_str(true));
    p
}

fn host_desc() -> String {
    format!("{} ({})", std::env::consts::OS, std::env::consts::ARCH)
}

fn log_summary(project: &ProjectConfig, opts: &ConfigureOptions, modules: &[String]) {
    tracing::info!(
        "========== {} build configuration ==========",
        project.display_name()
    );
    tracing::info!(
        "Platform: {}, host: {}, debug: {}, release: {}",
        opts.platform,
        host_desc(),
        opts.debug,
        opts.release
    );
    tracing::info!("Modules: {:?}, params: {:?}", modules, opts.params);
    tracing::info!(
        "Compiler: {} {}, frontend: '{}'",
        opts.compiler.id,
        opts.compiler.version,
        opts.compiler.frontend
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ProjectFixture;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
sources = ["src/core", "src/util", { path = "src/platform/{platform}", recursive = false }]
include-dirs = [{ path = "include", visibility = "public" }, "src"]
libraries = ["libs/bb/bb-{platform-bits}.a"]
silence-warnings = ["kj"]

[project]
name = "globed"
require-clang = true

[definitions]
GLOBED_BUILD = true
GLOBED_DEFAULT_MAIN_SERVER_URL = '"{server-url}"'

[dependencies.qunet-cpp]
repo = "dankmeme01/qunet-cpp"
tag = "{qunet-ver}"
link-name = "qunet"
options = { QUNET_DEBUG = "OFF" }

[modules]
search = ["comm"]
enabled = ["ui"]
definition-prefix = "GLOBED_MODULE_"

[[when]]
debug = true
definitions = { GLOBED_DEBUG = "1" }
variables = { QUNET_DEBUG = "ON" }

[[when]]
module = "scripting-ui"
mod-dependencies = { "alphalaneous.editortab_api" = ">=1.0.17" }
"#;

    fn fixture() -> ProjectFixture {
        ProjectFixture::new()
            .with_manifest(MANIFEST)
            .with_dirs([
                "src/core",
                "src/util",
                "src/platform/android",
                "src/modules/ui",
                "src/modules/comm/scripting-ui",
                "include",
            ])
    }

    fn options(root: &Path) -> ConfigureOptions {
        let mut params = IndexMap::new();
        params.insert("server-url".to_string(), "https://main.globed.dev".to_string());
        params.insert("qunet-ver".to_string(), "v0.4.0".to_string());

        ConfigureOptions {
            manifest_path: root.join("Prebuild.toml"),
            source_dir: root.to_path_buf(),
            build_dir: root.join("build"),
            output_file: Some(root.join("build").join("globed.cmake")),
            platform: Platform::Android64,
            debug: true,
            release: false,
            modules: vec!["scripting-ui".to_string(), "ui".to_string()],
            params,
            compiler: CompilerInfo::new("Clang", "GNU", "18.1.0"),
        }
    }

    fn setup() -> (TempDir, ConfigureOptions) {
        let tmp = TempDir::new().unwrap();
        fixture().write_to(tmp.path()).unwrap();
        fs::create_dir_all(tmp.path().join("build")).unwrap();
        let opts = options(tmp.path());
        (tmp, opts)
    }

    #[test]
    fn test_plan_collects_everything() {
        let (_tmp, opts) = setup();
        let manifest = Manifest::load(&opts.manifest_path).unwrap();
        let plan = plan(&manifest, &opts).unwrap();

        assert_eq!(plan.modules, ["ui", "scripting-ui"]);
        // 3 base sources + 2 modules
        assert_eq!(plan.cmake.sources().len(), 5);
        assert!(!plan.cmake.sources()[2].recursive);

        let defs = plan.cmake.definitions();
        assert_eq!(
            defs["GLOBED_DEFAULT_MAIN_SERVER_URL"].value.as_deref(),
            Some("\"https://main.globed.dev\"")
        );
        assert!(defs.contains_key("GLOBED_DEBUG"));
        assert!(defs.contains_key("GLOBED_MODULE_UI"));
        assert!(defs.contains_key("GLOBED_MODULE_SCRIPTING_UI"));

        assert_eq!(plan.cmake.variables()["QUNET_DEBUG"], "ON");
        assert_eq!(plan.cmake.dependencies()[0].tag, "v0.4.0");
        assert_eq!(
            plan.mod_dependencies["alphalaneous.editortab_api"],
            ">=1.0.17"
        );

        let libs: Vec<&str> = plan.cmake.libraries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(libs, ["libs/bb/bb-android64.a", "qunet"]);

        let last = plan.cmake.compile_options().last().unwrap();
        assert_eq!(last.target.as_deref(), Some("kj"));
        assert_eq!(last.option, "-w");
    }

    #[test]
    fn test_configure_writes_cmake_file() {
        let (tmp, opts) = setup();
        let result = configure(&opts).unwrap();

        let out = fs::read_to_string(tmp.path().join("build/globed.cmake")).unwrap();
        assert_eq!(out, result.plan.cmake.render().unwrap());
        assert!(out.contains("GIT_TAG \"v0.4.0\""));
        assert!(out.contains(
            "target_link_libraries(${PROJECT_NAME} PRIVATE \"${CMAKE_CURRENT_SOURCE_DIR}/libs/bb/bb-android64.a\")"
        ));
        assert!(result.mod_json.is_none());
    }

    #[test]
    fn test_configure_is_repeatable() {
        let (tmp, opts) = setup();
        let out = tmp.path().join("build/globed.cmake");

        configure(&opts).unwrap();
        let first = fs::read_to_string(&out).unwrap();
        configure(&opts).unwrap();
        let second = fs::read_to_string(&out).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_configure_writes_mod_json() {
        let tmp = TempDir::new().unwrap();
        fixture()
            .with_manifest(format!("{}\n[mod-json]\n", MANIFEST))
            .with_file("mod.json.template", r#"{"id": "globed", "dependencies": {}}"#)
            .write_to(tmp.path())
            .unwrap();
        fs::create_dir_all(tmp.path().join("build")).unwrap();

        let result = configure(&options(tmp.path())).unwrap();
        assert_eq!(result.mod_json, Some(tmp.path().join("mod.json")));

        let json = fs::read_to_string(tmp.path().join("mod.json")).unwrap();
        assert!(json.contains("alphalaneous.editortab_api"));
    }

    #[test]
    fn test_plan_without_output_writes_nothing() {
        let (tmp, mut opts) = setup();
        opts.output_file = None;

        let result = configure(&opts).unwrap();
        assert!(result.output_file.is_none());
        assert!(!tmp.path().join("build/globed.cmake").exists());
    }

    #[test]
    fn test_msvc_rejected() {
        let (_tmp, mut opts) = setup();
        opts.compiler = CompilerInfo::new("MSVC", "MSVC", "19.40");

        let err = configure(&opts).unwrap_err();
        let err = err.downcast_ref::<ConfigureError>().unwrap();
        assert!(matches!(err, ConfigureError::UnsupportedCompiler { .. }));
        assert!(err.to_string().contains("globed can only be built with Clang"));
    }

    #[test]
    fn test_clang_cl_rejected() {
        let project = ProjectConfig {
            require_clang: true,
            ..Default::default()
        };
        assert!(check_toolchain(&project, &CompilerInfo::new("Clang", "MSVC", "18")).is_err());
        assert!(check_toolchain(&project, &CompilerInfo::new("Clang", "GNU", "18")).is_ok());
        assert!(check_toolchain(&ProjectConfig::default(), &CompilerInfo::default()).is_ok());
    }

    #[test]
    fn test_missing_module_is_fatal() {
        let (tmp, mut opts) = setup();
        opts.modules.push("two-player".to_string());

        let err = configure(&opts).unwrap_err();
        match err.downcast_ref::<ConfigureError>() {
            Some(ConfigureError::ModuleNotFound { module, searched }) => {
                assert_eq!(module, "two-player");
                assert_eq!(searched.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!tmp.path().join("build/globed.cmake").exists());
    }

    #[test]
    fn test_missing_source_dir_is_fatal() {
        let (tmp, opts) = setup();
        fs::remove_dir_all(tmp.path().join("src/platform")).unwrap();

        let err = configure(&opts).unwrap_err();
        let source = err
            .chain()
            .find_map(|e| e.downcast_ref::<BuildFileError>())
            .unwrap();
        assert!(matches!(source, BuildFileError::SourceDirNotFound { .. }));
        assert!(!tmp.path().join("build/globed.cmake").exists());
    }

    #[test]
    fn test_duplicate_glob_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        fixture()
            .with_manifest(format!(
                "{}\n[mod-json]\n",
                MANIFEST.replace(r#""src/util","#, r#""src/./core","#)
            ))
            .with_file("mod.json.template", r#"{"id": "globed", "dependencies": {}}"#)
            .with_file("mod.json", "previous")
            .write_to(tmp.path())
            .unwrap();
        fs::create_dir_all(tmp.path().join("build")).unwrap();

        let err = configure(&options(tmp.path())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildFileError>(),
            Some(BuildFileError::DuplicateSourceGlob { .. })
        ));
        assert_eq!(
            fs::read_to_string(tmp.path().join("mod.json")).unwrap(),
            "previous"
        );
        assert!(!tmp.path().join("build/globed.cmake").exists());
    }

    #[test]
    fn test_empty_variable_name_is_an_error() {
        let (_tmp, opts) = setup();
        let mut manifest = Manifest::default();
        manifest.content.variables.insert(String::new(), "x".to_string());

        let err = plan(&manifest, &opts).unwrap_err();
        assert!(format!("{:#}", err).contains("variable name must not be empty"));
    }

    #[test]
    fn test_unknown_placeholder_is_fatal() {
        let (_tmp, mut opts) = setup();
        opts.params.shift_remove("qunet-ver");

        let err = configure(&opts).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown placeholder `{qunet-ver}`"));
    }

    #[test]
    fn test_enabled_modules_dedup() {
        let config = ModulesConfig {
            enabled: vec!["deathlink".into(), "ui".into()],
            ..Default::default()
        };
        let modules = enabled_modules(&config, &["ui".into(), " two-player ".into(), "".into()]);
        assert_eq!(modules, ["deathlink", "ui", "two-player"]);
    }

    #[test]
    fn test_module_definition() {
        assert_eq!(
            module_definition("GLOBED_MODULE_", "two-player"),
            "GLOBED_MODULE_TWO_PLAYER"
        );
    }
}
