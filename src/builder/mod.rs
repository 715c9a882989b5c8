//! CMake target description builder.
//!
//! This module holds the in-memory model of the generated file and the
//! renderer that turns it into CMake script.

pub mod cmake_file;
pub mod emit;
pub mod errors;

pub use cmake_file::{CMakeFile, CompileOption, Definition, SourceEntry};
pub use errors::BuildFileError;
