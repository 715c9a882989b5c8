//! `{name}` placeholder expansion for manifest strings.
//!
//! Manifest values may refer to configure-time inputs, e.g.
//! `sources = ["src/platform/{platform}"]` or `tag = "{qunet-ver}"`.
//! CMake's own `${VAR}` references pass through untouched, and `{{` produces
//! a literal brace.

use indexmap::IndexMap;
use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// Placeholder expansion failure.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("unknown placeholder `{{{name}}}` in `{input}`")]
#[diagnostic(
    code(prebuild::manifest::unknown_placeholder),
    help("Pass a value with `--param {name}=<value>`")
)]
pub struct UnknownPlaceholder {
    pub name: String,
    pub input: String,
}

/// Known placeholder values.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    values: IndexMap<String, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Placeholders::default()
    }

    /// Define a placeholder, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Expand every `{name}` in `input`.
    pub fn expand(&self, input: &str) -> Result<String, UnknownPlaceholder> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(idx) = rest.find('{') {
            let literal = &rest[..idx];
            out.push_str(literal);
            let after = &rest[idx..];

            // `${...}` belongs to CMake
            if literal.ends_with('$') {
                match after.find('}') {
                    Some(end) => {
                        out.push_str(&after[..=end]);
                        rest = &after[end + 1..];
                    }
                    None => {
                        out.push_str(after);
                        rest = "";
                    }
                }
                continue;
            }

            if let Some(stripped) = after.strip_prefix("{{") {
                out.push('{');
                rest = stripped;
                continue;
            }

            match after.find('}') {
                Some(end) => {
                    let name = &after[1..end];
                    let value = self.get(name).ok_or_else(|| UnknownPlaceholder {
                        name: name.to_string(),
                        input: input.to_string(),
                    })?;
                    out.push_str(value);
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(after);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}
