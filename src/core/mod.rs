//! Core data structures for prebuild.
//!
//! This module contains the foundational types the builder and the
//! configuration pass share:
//! - Visibility, library kinds and CPM dependencies
//! - Path classification against the project roots
//! - Platform and compiler identity
//! - The `Prebuild.toml` manifest, its conditions and placeholders

pub mod compiler;
pub mod condition;
pub mod dependency;
pub mod interpolate;
pub mod library_type;
pub mod manifest;
pub mod platform;
pub mod roots;
pub mod visibility;

pub use compiler::CompilerInfo;
pub use condition::{Condition, ConditionContext};
pub use dependency::CpmDependency;
pub use interpolate::Placeholders;
pub use library_type::LibraryType;
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use platform::Platform;
pub use roots::ProjectRoots;
pub use visibility::Visibility;
