//! Versioned on-disk cache layout.
//!
//! Structure:
//! ```text
//! <base>/                    # OS cache convention + /grit-cli
//! ├── 0.1.0/                 # one directory per release version
//! │   ├── grit
//! │   ├── grit-daemon
//! │   └── .complete          # written last; presence means fully installed
//! └── 0.1.0.lock             # exclusive lock scoped to the version directory
//! ```
//!
//! Version directories are never reused or pruned: upgrading adds a new
//! directory and leaves prior versions behind. Path computation is pure;
//! the only side effect in this module is base-directory creation.

use crate::platform::Platform;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// File whose presence marks a version directory as fully installed.
pub const COMPLETE_MARKER: &str = ".complete";

/// Cache directory name under the OS base cache location.
const CACHE_DIR_NAME: &str = "grit-cli";

/// The launcher's on-disk cache layout.
#[derive(Debug, Clone)]
pub struct CacheLayout {
    base: PathBuf,
}

impl CacheLayout {
    /// Resolve the cache layout from OS conventions.
    ///
    /// - Windows: `%LOCALAPPDATA%` (fallback `<home>/AppData/Local`)
    /// - Darwin: `<home>/Library/Caches`
    /// - other POSIX: `$XDG_CACHE_HOME` (fallback `<home>/.cache`)
    ///
    /// each with `/grit-cli` appended.
    pub fn resolve() -> Result<Self> {
        let base = platform_base_dir().ok_or_else(|| {
            Error::filesystem(
                CACHE_DIR_NAME,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine home directory",
                ),
            )
        })?;
        Ok(Self::at(base.join(CACHE_DIR_NAME)))
    }

    /// Create a layout rooted at an explicit base directory.
    #[must_use]
    pub fn at(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The base cache directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Create the base directory if absent. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Filesystem`] when the target is not creatable or
    /// not writable.
    pub fn ensure_base(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base).map_err(|e| Error::filesystem(&self.base, e))
    }

    /// Directory dedicated to one release version's binaries.
    #[must_use]
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.base.join(version)
    }

    /// Path of a binary inside a version directory, with the platform
    /// executable suffix applied.
    #[must_use]
    pub fn binary_path(&self, version: &str, name: &str, platform: &Platform) -> PathBuf {
        self.version_dir(version).join(platform.binary_name(name))
    }

    /// Path of the completion marker for a version.
    #[must_use]
    pub fn completion_marker(&self, version: &str) -> PathBuf {
        self.version_dir(version).join(COMPLETE_MARKER)
    }

    /// Path of the lock file guarding installation of a version.
    #[must_use]
    pub fn lock_path(&self, version: &str) -> PathBuf {
        self.base.join(format!("{version}.lock"))
    }

    /// Whether a version is fully installed.
    #[must_use]
    pub fn is_installed(&self, version: &str) -> bool {
        self.completion_marker(version).exists()
    }
}

/// OS-convention base cache location (without the `grit-cli` component).
fn platform_base_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var_os("LOCALAPPDATA")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join("AppData").join("Local")))
    }

    #[cfg(target_os = "macos")]
    {
        dirs::home_dir().map(|h| h.join("Library").join("Caches"))
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        // An empty XDG_CACHE_HOME counts as unset, per the basedir spec.
        std::env::var_os("XDG_CACHE_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Os};

    #[test]
    fn test_paths_are_pure() {
        let layout = CacheLayout::at("/tmp/grit-cache");
        let platform = Platform::new(Os::Linux, Arch::X86_64);

        let first = layout.binary_path("0.1.0", "grit", &platform);
        let second = layout.binary_path("0.1.0", "grit", &platform);
        assert_eq!(first, second);
        assert_eq!(first, PathBuf::from("/tmp/grit-cache/0.1.0/grit"));
    }

    #[test]
    fn test_version_dir_is_unique_per_version() {
        let layout = CacheLayout::at("/tmp/grit-cache");
        assert_ne!(layout.version_dir("0.1.0"), layout.version_dir("0.2.0"));
        assert_eq!(
            layout.version_dir("0.2.0"),
            PathBuf::from("/tmp/grit-cache/0.2.0")
        );
    }

    #[test]
    fn test_windows_suffix_applied() {
        let layout = CacheLayout::at("/tmp/grit-cache");
        let platform = Platform::new(Os::Windows, Arch::X86_64);
        assert_eq!(
            layout.binary_path("0.1.0", "grit", &platform),
            PathBuf::from("/tmp/grit-cache/0.1.0/grit.exe")
        );
    }

    #[test]
    fn test_marker_and_lock_paths() {
        let layout = CacheLayout::at("/tmp/grit-cache");
        assert_eq!(
            layout.completion_marker("0.1.0"),
            PathBuf::from("/tmp/grit-cache/0.1.0/.complete")
        );
        assert_eq!(
            layout.lock_path("0.1.0"),
            PathBuf::from("/tmp/grit-cache/0.1.0.lock")
        );
    }

    #[test]
    fn test_ensure_base_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let layout = CacheLayout::at(temp.path().join("grit-cli"));
        layout.ensure_base().unwrap();
        layout.ensure_base().unwrap();
        assert!(layout.base().is_dir());
    }

    #[test]
    fn test_is_installed_requires_marker() {
        let temp = tempfile::tempdir().unwrap();
        let layout = CacheLayout::at(temp.path());
        std::fs::create_dir_all(layout.version_dir("0.1.0")).unwrap();
        assert!(!layout.is_installed("0.1.0"));

        std::fs::write(layout.completion_marker("0.1.0"), b"").unwrap();
        assert!(layout.is_installed("0.1.0"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_resolve_honors_xdg_cache_home() {
        temp_env::with_var("XDG_CACHE_HOME", Some("/tmp/custom-cache"), || {
            let layout = CacheLayout::resolve().unwrap();
            assert_eq!(layout.base(), Path::new("/tmp/custom-cache/grit-cli"));
        });
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_resolve_falls_back_to_dot_cache() {
        temp_env::with_var("XDG_CACHE_HOME", None::<&str>, || {
            let layout = CacheLayout::resolve().unwrap();
            assert!(layout.base().ends_with(".cache/grit-cli"));
        });
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_resolve_treats_empty_xdg_as_unset() {
        temp_env::with_var("XDG_CACHE_HOME", Some(""), || {
            let layout = CacheLayout::resolve().unwrap();
            assert!(layout.base().ends_with(".cache/grit-cli"));
        });
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_resolve_uses_library_caches() {
        let layout = CacheLayout::resolve().unwrap();
        assert!(layout.base().ends_with("Library/Caches/grit-cli"));
    }
}
