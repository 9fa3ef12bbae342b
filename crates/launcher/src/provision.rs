//! The download-extract-install pipeline.
//!
//! A version is provisioned in three phases, none of which expose partial
//! state at the final cache path:
//!
//! 1. Download and extract the release archive inside a private temporary
//!    directory (removed on every exit path).
//! 2. Stage the required binaries into a fresh directory under the cache
//!    base, so the final step stays on one filesystem. The completion
//!    marker is written into the stage last.
//! 3. Under an exclusive file lock scoped to the version, atomically
//!    rename the staged directory into place. Concurrent launchers either
//!    win the rename or observe the winner's marker and back off.

use crate::cache::CacheLayout;
use crate::platform::Platform;
use crate::{Error, Result, extract, fetch};
use fs4::fs_std::FileExt;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Logical name of the tool this launcher provisions.
pub const TOOL: &str = "grit";

/// Release version embedded in this package.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Binaries every install must provide, primary first.
pub const REQUIRED_BINARIES: [&str; 2] = ["grit", "grit-daemon"];

/// Release-hosting base URL (expanded with `/releases/download/v<version>/`).
const DEFAULT_RELEASE_BASE: &str = "https://github.com/neul-labs/grit";

/// What to provision: a tool at a fixed version, with the binaries an
/// install must contain. Built once per invocation and never mutated.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    /// Logical tool name; also the prefix of the archive's top directory.
    pub tool: String,
    /// Release version.
    pub version: String,
    /// Logical binary names required in the install, primary first.
    pub binaries: Vec<String>,
}

impl ProvisionRequest {
    /// The request for the version embedded in this package.
    #[must_use]
    pub fn current() -> Self {
        Self {
            tool: TOOL.to_string(),
            version: VERSION.to_string(),
            binaries: REQUIRED_BINARIES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Ensures a version's binaries exist in the cache, installing on miss.
#[derive(Debug)]
pub struct Provisioner {
    layout: CacheLayout,
    platform: Platform,
    base_url: String,
}

impl Provisioner {
    /// Create a provisioner over the given cache layout and platform.
    #[must_use]
    pub fn new(layout: CacheLayout, platform: Platform) -> Self {
        Self {
            layout,
            platform,
            base_url: DEFAULT_RELEASE_BASE.to_string(),
        }
    }

    /// Override the release-hosting base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Ensure the requested binaries are present in the cache.
    ///
    /// Returns a map from logical binary name to its cached path. A cache
    /// hit is decided by the completion marker, not by any individual
    /// binary's existence, so a partially failed prior install is never
    /// mistaken for a good one.
    pub fn ensure(&self, request: &ProvisionRequest) -> Result<HashMap<String, PathBuf>> {
        if self.layout.is_installed(&request.version) {
            debug!(version = %request.version, "Cache hit");
            return Ok(self.binary_map(request));
        }

        self.layout.ensure_base()?;

        let triple = self.platform.triple();
        let archive_name = format!(
            "{}-{}-{}{}",
            request.tool,
            request.version,
            triple,
            self.platform.archive_ext()
        );
        let url = format!(
            "{}/releases/download/v{}/{}",
            self.base_url, request.version, archive_name
        );

        eprintln!(
            "Downloading {} v{} for {}...",
            request.tool, request.version, triple
        );

        // Partially downloaded or extracted state only ever lives here.
        let work = tempfile::tempdir()?;
        let archive_path = work.path().join(&archive_name);
        fetch::download(&url, &archive_path)?;

        self.install_archive(request, &archive_path, work.path())?;

        eprintln!(
            "Successfully installed {} to {}",
            request.tool,
            self.layout.version_dir(&request.version).display()
        );

        Ok(self.binary_map(request))
    }

    /// Extract an archive, stage the required binaries, and commit the
    /// staged directory into the cache.
    pub(crate) fn install_archive(
        &self,
        request: &ProvisionRequest,
        archive: &Path,
        work: &Path,
    ) -> Result<()> {
        extract::unpack(archive, work)?;
        let extracted = extract::locate_tool_dir(work, &request.tool)?;

        // Stage under the cache base so the commit rename cannot cross
        // filesystems.
        let stage_root = tempfile::Builder::new()
            .prefix(".stage-")
            .tempdir_in(self.layout.base())
            .map_err(|e| Error::filesystem(self.layout.base(), e))?;
        let staged = stage_root.path().join(&request.version);

        self.stage(request, &extracted, &staged)?;
        self.commit(&request.version, &staged)?;

        info!(version = %request.version, "Installed release");
        Ok(())
    }

    /// Copy the required binaries from the extracted tree into `staged`,
    /// set execute permissions, and write the completion marker last.
    fn stage(&self, request: &ProvisionRequest, extracted: &Path, staged: &Path) -> Result<()> {
        std::fs::create_dir_all(staged)?;

        for name in &request.binaries {
            let file_name = self.platform.binary_name(name);
            let src = extracted.join(&file_name);
            let dst = staged.join(&file_name);

            std::fs::copy(&src, &dst).map_err(|e| {
                Error::provision(format!(
                    "expected binary '{}' missing from archive: {e}",
                    src.display()
                ))
            })?;

            // Archive permission bits are not trusted (zip has none).
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mut perms = std::fs::metadata(&dst)?.permissions();
                perms.set_mode(perms.mode() | 0o111);
                std::fs::set_permissions(&dst, perms)?;
            }
        }

        std::fs::write(staged.join(crate::cache::COMPLETE_MARKER), b"")?;
        Ok(())
    }

    /// Make the staged directory visible at the version path with a single
    /// rename, guarded by an exclusive lock scoped to the version.
    fn commit(&self, version: &str, staged: &Path) -> Result<()> {
        let lock_path = self.layout.lock_path(version);
        let lock = File::create(&lock_path).map_err(|e| Error::filesystem(&lock_path, e))?;
        lock.lock_exclusive()
            .map_err(|e| Error::filesystem(&lock_path, e))?;

        let result = self.commit_locked(version, staged);

        // The OS releases the lock when the handle drops.
        drop(lock);
        result
    }

    fn commit_locked(&self, version: &str, staged: &Path) -> Result<()> {
        let version_dir = self.layout.version_dir(version);

        // Another process may have completed the install while this one
        // was downloading; its result is equivalent, so keep it.
        if self.layout.is_installed(version) {
            debug!(version, "Concurrent install won the race");
            return Ok(());
        }

        // A version directory without a marker is debris from a crashed
        // install predating the marker scheme.
        if version_dir.exists() {
            std::fs::remove_dir_all(&version_dir)
                .map_err(|e| Error::filesystem(&version_dir, e))?;
        }

        std::fs::rename(staged, &version_dir).map_err(|e| Error::filesystem(&version_dir, e))
    }

    fn binary_map(&self, request: &ProvisionRequest) -> HashMap<String, PathBuf> {
        request
            .binaries
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    self.layout
                        .binary_path(&request.version, name, &self.platform),
                )
            })
            .collect()
    }
}
