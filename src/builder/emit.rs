//! Rendering of a [`CMakeFile`] to CMake script text.
//!
//! Sections are always emitted in the same order (messages, variables,
//! sources, target, definitions, include directories, dependencies, compile
//! options, link libraries), and entries keep their registration order inside
//! each section, so identical inputs give byte-identical output.

use std::collections::HashSet;
use std::path::Path;

use crate::builder::cmake_file::CMakeFile;
use crate::builder::errors::BuildFileError;
use crate::core::dependency::CpmDependency;
use crate::util::hash::short_hash;

/// First line of every generated file.
pub const HEADER: &str = "# Generated by prebuild, DO NOT EDIT THIS FILE DIRECTLY";

/// Reference to the consuming project's target.
pub const PROJECT_TARGET: &str = "${PROJECT_NAME}";

/// Name of the collection variable for a rendered glob pattern.
pub fn source_var_name(converted: &str) -> String {
    format!("SOURCES_{}", short_hash(converted))
}

/// Render the full file.
pub fn render(file: &CMakeFile) -> Result<String, BuildFileError> {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str("\n\n");

    for message in file.messages() {
        out.push_str(&format!("message(STATUS \"{}\")\n", message));
    }

    for (name, value) in file.variables() {
        out.push_str(&format!("set({} \"{}\")\n", name, value));
    }

    render_sources(file, &mut out)?;

    out.push_str(&format!(
        "\nadd_library({} {} ${{SOURCES}})\n",
        PROJECT_TARGET,
        file.library_type()
    ));

    for (name, def) in file.definitions() {
        let define = match def.value {
            Some(ref value) => format!("{}={}", name, value),
            None => name.clone(),
        };
        out.push_str(&format!(
            "target_compile_definitions({} {} {})\n",
            PROJECT_TARGET, def.visibility, define
        ));
    }

    out.push_str("\n# Include directories\n");
    for (path, visibility) in file.include_dirs() {
        out.push_str(&format!(
            "target_include_directories({} {} {})\n",
            PROJECT_TARGET,
            visibility,
            file.convert_path(path)
        ));
    }

    out.push_str("\n# CPM Dependencies\n");
    for dep in file.dependencies() {
        render_dependency(dep, &mut out);
    }

    out.push_str("\n# Compile options\n");
    for opt in file.compile_options() {
        let target = opt.target.as_deref().unwrap_or(PROJECT_TARGET);
        out.push_str(&format!(
            "target_compile_options({} {} {})\n",
            target, opt.visibility, opt.option
        ));
    }

    out.push_str("\n# Linked libraries\n");
    for (name, visibility) in file.libraries() {
        let name = if is_path_like(name) {
            file.convert_path(Path::new(name))
        } else {
            name.clone()
        };
        out.push_str(&format!(
            "target_link_libraries({} {} {})\n",
            PROJECT_TARGET, visibility, name
        ));
    }

    Ok(out)
}

fn render_sources(file: &CMakeFile, out: &mut String) -> Result<(), BuildFileError> {
    out.push_str("\n\n# Source files\n");
    out.push_str("set(SOURCES \"\")\n");

    let mut var_names: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for entry in file.sources() {
        let converted = file.convert_path(&entry.path);

        if entry.is_glob() {
            let name = source_var_name(&converted);
            if !seen.insert(name.clone()) {
                return Err(BuildFileError::DuplicateSourceGlob {
                    pattern: converted,
                    identifier: name,
                });
            }

            let glob_type = if entry.recursive { "GLOB_RECURSE" } else { "GLOB" };
            out.push_str(&format!(
                "file({} {} CONFIGURE_DEPENDS {})\n",
                glob_type, name, converted
            ));
            var_names.push(name);
        } else {
            out.push_str(&format!("list(APPEND SOURCES {})\n", converted));
        }
    }

    for name in &var_names {
        out.push_str(&format!("list(APPEND SOURCES ${{{}}})\n", name));
    }

    Ok(())
}

fn render_dependency(dep: &CpmDependency, out: &mut String) {
    out.push_str("CPMAddPackage(\n");
    out.push_str(&format!("    NAME {}\n", dep.name));
    out.push_str(&format!("    GIT_REPOSITORY \"{}\"\n", dep.repository_url()));
    out.push_str(&format!("    GIT_TAG \"{}\"\n", dep.tag));

    if !dep.options.is_empty() {
        out.push_str("    OPTIONS\n");
        for (key, value) in &dep.options {
            out.push_str(&format!("        \"{} {}\"\n", key, value));
        }
    }

    out.push_str(")\n");
}

/// Library names containing a separator are filesystem paths.
fn is_path_like(name: &str) -> bool {
    name.contains('/') || name.contains('\\')
}
