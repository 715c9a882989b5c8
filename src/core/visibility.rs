//! Propagation scope for target properties.
//!
//! Public properties propagate to targets that link against this one,
//! private ones apply to this target only.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// CMake usage-requirement scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Propagates to dependents
    #[serde(alias = "PUBLIC")]
    Public,
    /// Applies only to the target itself
    #[default]
    #[serde(alias = "PRIVATE")]
    Private,
}

impl Visibility {
    /// The CMake keyword for this scope.
    pub fn as_cmake(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cmake())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            _ => Err(format!(
                "invalid visibility '{}'; expected 'public' or 'private'",
                s
            )),
        }
    }
}
