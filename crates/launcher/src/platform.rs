//! Platform detection and release naming.
//!
//! Maps the host OS and CPU architecture to the target triple used in
//! release archive names, plus the OS naming conventions (executable
//! suffix, archive extension). The mapping is a closed table: supporting
//! a new platform means adding a row, not branching logic.

use crate::{Error, Result};
use std::fmt;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// macOS.
    Darwin,
    /// Linux (glibc).
    Linux,
    /// Windows (MSVC toolchain).
    Windows,
}

impl Os {
    /// Parse from a host OS string as reported by `std::env::consts::OS`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "darwin" | "macos" => Some(Self::Darwin),
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }

    /// Target-triple suffix for this OS family.
    #[must_use]
    pub fn family(self) -> &'static str {
        match self {
            Self::Darwin => "apple-darwin",
            Self::Linux => "unknown-linux-gnu",
            Self::Windows => "pc-windows-msvc",
        }
    }

    /// Suffix appended to executable names.
    #[must_use]
    pub fn exe_suffix(self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::Darwin | Self::Linux => "",
        }
    }

    /// Extension of the release archive for this OS.
    #[must_use]
    pub fn archive_ext(self) -> &'static str {
        match self {
            Self::Windows => ".zip",
            Self::Darwin | Self::Linux => ".tar.gz",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Darwin => write!(f, "darwin"),
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 64-bit ARM.
    Aarch64,
    /// 64-bit x86.
    X86_64,
}

impl Arch {
    /// Parse from a host architecture string as reported by
    /// `std::env::consts::ARCH`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "aarch64" | "arm64" => Some(Self::Aarch64),
            "x86_64" | "amd64" => Some(Self::X86_64),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aarch64 => write!(f, "aarch64"),
            Self::X86_64 => write!(f, "x86_64"),
        }
    }
}

/// A resolved host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Create a platform from known components.
    #[must_use]
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detect the host platform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] when either the OS or the
    /// architecture has no release mapping.
    pub fn detect() -> Result<Self> {
        Self::from_host(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Resolve a platform from raw host strings.
    pub fn from_host(os: &str, arch: &str) -> Result<Self> {
        match (Os::parse(os), Arch::parse(arch)) {
            (Some(os), Some(arch)) => Ok(Self { os, arch }),
            _ => Err(Error::unsupported_platform(os, arch)),
        }
    }

    /// Target triple used to select the release archive.
    ///
    /// Releases ship a single universal archive for all Darwin
    /// architectures, so the arch component is fixed there.
    #[must_use]
    pub fn triple(&self) -> String {
        match self.os {
            Os::Darwin => format!("universal-{}", self.os.family()),
            Os::Linux | Os::Windows => format!("{}-{}", self.arch, self.os.family()),
        }
    }

    /// Executable suffix for this platform.
    #[must_use]
    pub fn exe_suffix(&self) -> &'static str {
        self.os.exe_suffix()
    }

    /// Release archive extension for this platform.
    #[must_use]
    pub fn archive_ext(&self) -> &'static str {
        self.os.archive_ext()
    }

    /// Apply the executable suffix to a logical binary name.
    #[must_use]
    pub fn binary_name(&self, name: &str) -> String {
        format!("{name}{}", self.exe_suffix())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.triple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darwin_is_always_universal() {
        // Both Darwin architectures must map to the same triple.
        let arm = Platform::new(Os::Darwin, Arch::Aarch64);
        let x86 = Platform::new(Os::Darwin, Arch::X86_64);
        assert_eq!(arm.triple(), "universal-apple-darwin");
        assert_eq!(x86.triple(), "universal-apple-darwin");
    }

    #[test]
    fn test_non_darwin_triples() {
        assert_eq!(
            Platform::new(Os::Linux, Arch::X86_64).triple(),
            "x86_64-unknown-linux-gnu"
        );
        assert_eq!(
            Platform::new(Os::Linux, Arch::Aarch64).triple(),
            "aarch64-unknown-linux-gnu"
        );
        assert_eq!(
            Platform::new(Os::Windows, Arch::X86_64).triple(),
            "x86_64-pc-windows-msvc"
        );
        assert_eq!(
            Platform::new(Os::Windows, Arch::Aarch64).triple(),
            "aarch64-pc-windows-msvc"
        );
    }

    #[test]
    fn test_os_parse() {
        assert_eq!(Os::parse("macos"), Some(Os::Darwin));
        assert_eq!(Os::parse("darwin"), Some(Os::Darwin));
        assert_eq!(Os::parse("linux"), Some(Os::Linux));
        assert_eq!(Os::parse("windows"), Some(Os::Windows));
        assert_eq!(Os::parse("freebsd"), None);
        assert_eq!(Os::parse(""), None);
    }

    #[test]
    fn test_arch_parse() {
        assert_eq!(Arch::parse("aarch64"), Some(Arch::Aarch64));
        assert_eq!(Arch::parse("arm64"), Some(Arch::Aarch64));
        assert_eq!(Arch::parse("x86_64"), Some(Arch::X86_64));
        assert_eq!(Arch::parse("amd64"), Some(Arch::X86_64));
        assert_eq!(Arch::parse("riscv64"), None);
        assert_eq!(Arch::parse("mips"), None);
    }

    #[test]
    fn test_from_host_unsupported_is_typed() {
        let err = Platform::from_host("freebsd", "x86_64").unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform { .. }));

        let err = Platform::from_host("linux", "riscv64").unwrap_err();
        match err {
            Error::UnsupportedPlatform { os, arch } => {
                assert_eq!(os, "linux");
                assert_eq!(arch, "riscv64");
            }
            other => panic!("expected UnsupportedPlatform, got {other:?}"),
        }
    }

    #[test]
    fn test_detect_current_host() {
        // The test host itself must be a supported platform.
        let p = Platform::detect().unwrap();
        assert!(!p.triple().is_empty());
    }

    #[test]
    fn test_exe_suffix_and_archive_ext() {
        let win = Platform::new(Os::Windows, Arch::X86_64);
        assert_eq!(win.exe_suffix(), ".exe");
        assert_eq!(win.archive_ext(), ".zip");
        assert_eq!(win.binary_name("grit"), "grit.exe");

        let linux = Platform::new(Os::Linux, Arch::X86_64);
        assert_eq!(linux.exe_suffix(), "");
        assert_eq!(linux.archive_ext(), ".tar.gz");
        assert_eq!(linux.binary_name("grit"), "grit");

        let mac = Platform::new(Os::Darwin, Arch::Aarch64);
        assert_eq!(mac.exe_suffix(), "");
        assert_eq!(mac.archive_ext(), ".tar.gz");
    }

    #[test]
    fn test_display() {
        let p = Platform::new(Os::Linux, Arch::Aarch64);
        assert_eq!(p.to_string(), "aarch64-unknown-linux-gnu");
    }
}
