//! High-level operations.
//!
//! This module contains the implementation of prebuild commands.

pub mod mod_json;
pub mod prebuild_configure;

pub use mod_json::generate_mod_json;
pub use prebuild_configure::{
    configure, plan, ConfigureError, ConfigureOptions, ConfigurePlan, ConfigureResult,
};
