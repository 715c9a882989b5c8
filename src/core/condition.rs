//! Conditions for `[[when]]` manifest blocks.
//!
//! Every field that is set must match; an empty condition always matches.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::core::compiler::CompilerInfo;
use crate::core::platform::Platform;
use crate::util::flag::truthy;

/// Condition guarding a block of manifest content.
///
/// `module` and `param` accept a leading `!` to negate the test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Condition {
    /// Platform name or family: `windows`, `android64`, `mobile`, `apple`...
    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub debug: Option<bool>,

    #[serde(default)]
    pub release: Option<bool>,

    /// Module that must be enabled
    #[serde(default)]
    pub module: Option<String>,

    /// `--param` whose value must be truthy
    #[serde(default)]
    pub param: Option<String>,

    /// Compiler family: `clang`, `clang-cl`, `msvc`, `gcc`
    #[serde(default)]
    pub compiler: Option<String>,
}

/// Configure-time facts a condition is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct ConditionContext<'a> {
    pub platform: Platform,
    pub debug: bool,
    pub release: bool,
    pub modules: &'a [String],
    pub params: &'a IndexMap<String, String>,
    pub compiler: &'a CompilerInfo,
}

impl Condition {
    /// Check if this condition holds.
    pub fn matches(&self, ctx: &ConditionContext<'_>) -> bool {
        if let Some(ref platform) = self.platform {
            if !ctx.platform.matches_name(platform) {
                return false;
            }
        }
        if let Some(debug) = self.debug {
            if debug != ctx.debug {
                return false;
            }
        }
        if let Some(release) = self.release {
            if release != ctx.release {
                return false;
            }
        }
        if let Some(ref module) = self.module {
            let (negated, name) = split_negation(module);
            if ctx.modules.iter().any(|m| m == name) == negated {
                return false;
            }
        }
        if let Some(ref param) = self.param {
            let (negated, name) = split_negation(param);
            let set = ctx.params.get(name).map(|v| truthy(v)).unwrap_or(false);
            if set == negated {
                return false;
            }
        }
        if let Some(ref compiler) = self.compiler {
            if !compiler.eq_ignore_ascii_case(ctx.compiler.family()) {
                return false;
            }
        }
        true
    }
}

fn split_negation(s: &str) -> (bool, &str) {
    match s.strip_prefix('!') {
        Some(rest) => (true, rest.trim()),
        None => (false, s.trim()),
    }
}
