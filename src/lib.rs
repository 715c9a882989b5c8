//! prebuild - configuration-time generator for CMake target descriptions
//!
//! This crate provides the core library functionality for prebuild:
//! the in-memory model of a native library target, its rendering to a CMake
//! script, and the configuration pass that fills it from `Prebuild.toml`.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for prebuild unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildFileError, CMakeFile};
pub use core::{CpmDependency, Manifest, Platform, ProjectRoots, Visibility};
