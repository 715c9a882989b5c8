//! Mod metadata generation.
//!
//! The project keeps a `mod.json.template`; configuration copies it to
//! `mod.json` with extra entries merged into its `dependencies` object.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::util::fs::{read_to_string, write_atomic};

/// Merge `extra` into the template's `dependencies` and write the result.
pub fn generate_mod_json(
    template: &Path,
    output: &Path,
    extra: &IndexMap<String, String>,
) -> Result<()> {
    let text = read_to_string(template)?;
    let mut data: Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse mod template: {}", template.display()))?;

    merge_dependencies(&mut data, extra)
        .with_context(|| format!("invalid mod template: {}", template.display()))?;

    let rendered = to_pretty_json(&data)?;
    write_atomic(output, &rendered)
        .with_context(|| format!("failed to write file: {}", output.display()))?;

    tracing::debug!(
        "wrote {} with {} extra dependencies",
        output.display(),
        extra.len()
    );
    Ok(())
}

/// Insert every entry of `extra` into `data["dependencies"]`.
pub fn merge_dependencies(data: &mut Value, extra: &IndexMap<String, String>) -> Result<()> {
    let root = data
        .as_object_mut()
        .ok_or_else(|| anyhow!("top-level value is not an object"))?;

    let deps = root
        .entry("dependencies")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| anyhow!("`dependencies` is not an object"))?;

    for (key, version) in extra {
        deps.insert(key.clone(), Value::String(version.clone()));
    }

    Ok(())
}

/// Serialize with four-space indentation.
fn to_pretty_json(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("failed to serialize mod metadata")?;
    Ok(String::from_utf8(buf)?)
}
