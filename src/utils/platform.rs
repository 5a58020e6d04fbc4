//! Platform naming for release archives.
//!
//! Release archives are named after Go-style platform identifiers
//! (`linux`, `darwin`, `amd64`, `arm64`, ...), which differ from Rust's
//! [`std::env::consts`]. This module maps the host platform onto those names
//! and carries the fully resolved download target.

/// Operating systems release archives are published for.
pub const KNOWN_OS: &[&str] = &["linux", "darwin", "windows", "freebsd", "openbsd", "solaris"];

/// Architectures release archives are published for.
pub const KNOWN_ARCH: &[&str] = &["amd64", "386", "arm64", "arm"];

/// The concrete OS, architecture and version a run fetches.
///
/// Created once per invocation. `version` never carries a leading `v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Release OS name, e.g. `linux`
    pub os: String,
    /// Release architecture name, e.g. `amd64`
    pub arch: String,
    /// Normalised version, e.g. `1.7.0`
    pub version: String,
}

impl ResolvedTarget {
    /// Build a target, filling empty `os`/`arch` overrides from the host.
    pub fn new(os: Option<&str>, arch: Option<&str>, version: impl Into<String>) -> Self {
        let pick = |value: Option<&str>, host: fn() -> String| {
            value.filter(|v| !v.is_empty()).map_or_else(host, ToString::to_string)
        };

        Self {
            os: pick(os, host_os),
            arch: pick(arch, host_arch),
            version: version.into(),
        }
    }

    /// Whether the target is a Windows build.
    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }
}

/// Host OS in release naming.
///
/// Unknown platforms pass through unchanged so an explicit archive can still be
/// requested for them.
pub fn host_os() -> String {
    release_os(std::env::consts::OS).to_string()
}

/// Host architecture in release naming.
pub fn host_arch() -> String {
    release_arch(std::env::consts::ARCH).to_string()
}

/// Map a Rust OS name to its release name.
pub fn release_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        "illumos" => "solaris",
        other => other,
    }
}

/// Map a Rust architecture name to its release name.
pub fn release_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        other => other,
    }
}
