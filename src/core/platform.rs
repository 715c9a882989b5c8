//! Target platform selection.

use std::fmt;
use std::str::FromStr;

/// Platform the native library is being configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Android32,
    Android64,
    Mac,
    Ios,
}

impl Platform {
    /// Short platform name as used in directory names.
    ///
    /// With `include_bits`, Android variants carry their pointer width
    /// (`android32`, `android64`); other platforms are unaffected.
    pub fn as_str(&self, include_bits: bool) -> &'static str {
        match (self, include_bits) {
            (Platform::Windows, _) => "windows",
            (Platform::Android32, true) => "android32",
            (Platform::Android64, true) => "android64",
            (Platform::Android32 | Platform::Android64, false) => "android",
            (Platform::Mac, _) => "macos",
            (Platform::Ios, _) => "ios",
        }
    }

    pub fn is_windows(&self) -> bool {
        *self == Platform::Windows
    }

    pub fn is_android(&self) -> bool {
        matches!(self, Platform::Android32 | Platform::Android64)
    }

    pub fn is_mac(&self) -> bool {
        *self == Platform::Mac
    }

    pub fn is_ios(&self) -> bool {
        *self == Platform::Ios
    }

    pub fn is_desktop(&self) -> bool {
        matches!(self, Platform::Windows | Platform::Mac)
    }

    pub fn is_mobile(&self) -> bool {
        !self.is_desktop()
    }

    pub fn is_apple(&self) -> bool {
        matches!(self, Platform::Mac | Platform::Ios)
    }

    /// Check a platform name from a manifest condition.
    ///
    /// Accepts either the short or the bit-qualified name, plus the
    /// family names `desktop`, `mobile` and `apple`.
    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        match name.as_str() {
            "desktop" => self.is_desktop(),
            "mobile" => self.is_mobile(),
            "apple" => self.is_apple(),
            other => other == self.as_str(false) || other == self.as_str(true),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str(true))
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win" | "win64" => Ok(Platform::Windows),
            "android32" => Ok(Platform::Android32),
            "android64" => Ok(Platform::Android64),
            "macos" => Ok(Platform::Mac),
            "ios" => Ok(Platform::Ios),
            _ => Err(format!("unknown platform: {}", s)),
        }
    }
}
