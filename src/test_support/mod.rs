//! Test utilities for prebuild unit tests.
//!
//! Provides fixtures that lay out a project tree (manifest, source
//! directories, files) in a temporary directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::ProjectFixture;
//!
//! #[test]
//! fn test_example() {
//!     let tmp = tempfile::TempDir::new().unwrap();
//!     let root = ProjectFixture::minimal().write_to(tmp.path()).unwrap();
//!     // Run a configuration pass against `root`...
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;
