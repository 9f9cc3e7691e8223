//! Version information embedded from the package manifest.

use std::fmt;

/// Package metadata known at compile time
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    /// Debug assertions on means a dev build
    pub profile: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            profile: if cfg!(debug_assertions) { "debug" } else { "release" },
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.version)?;
        writeln!(f, "  {}", self.description)?;
        writeln!(f, "  Profile: {}", self.profile)
    }
}

/// Print version information to stdout
pub fn print_version() {
    print!("{}", BuildInfo::current());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let info = BuildInfo::current();
        let display = info.to_string();
        assert!(display.starts_with("scenario-builder "));
        assert!(display.contains(info.version));
        assert!(display.contains("Profile:"));
    }
}
