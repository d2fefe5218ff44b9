use std::fmt;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux.
    Linux,
    /// macOS.
    MacOs,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Linux => write!(f, "linux"),
            Os::MacOs => write!(f, "macos"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone, Copy)]
pub struct Platform {
    /// The detected operating system.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: if cfg!(target_os = "macos") {
                Os::MacOs
            } else {
                // Default to Linux for other Unix-like systems
                Os::Linux
            },
        }
    }

    /// Create a platform with an explicit OS (for testing).
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Whether a config fragment with the given file stem is active here.
    ///
    /// Fragments whose stem ends in `-linux` or `-macos` are OS-specific;
    /// everything else is active on every platform.
    #[must_use]
    pub fn fragment_enabled(&self, stem: &str) -> bool {
        fragment_os(stem).is_none_or(|os| os == self.os)
    }
}

/// The OS a fragment file stem is restricted to, if any.
#[must_use]
pub fn fragment_os(stem: &str) -> Option<Os> {
    if stem.ends_with("-linux") {
        Some(Os::Linux)
    } else if stem.ends_with("-macos") {
        Some(Os::MacOs)
    } else {
        None
    }
}
