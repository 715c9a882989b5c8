//! Shared utilities

pub mod diagnostic;
pub mod flag;
pub mod fs;
pub mod hash;

pub use diagnostic::Diagnostic;
pub use flag::truthy;
