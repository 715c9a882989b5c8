//! Boolean values as CMake passes them on the command line.

/// Interpret a CMake-style boolean string.
///
/// `1`, `true`, `yes`, `on` and `y` (any case) are true; everything else,
/// including the empty string, is false.
pub fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "y"
    )
}

/// Infallible value parser for clap arguments.
pub fn parse_truthy(value: &str) -> Result<bool, String> {
    Ok(truthy(value))
}
