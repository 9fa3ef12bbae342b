//! Delegation to the provisioned binary.
//!
//! On Unix the current process image is replaced outright, so argv, the
//! standard streams, the environment, and the exit code all belong to the
//! target binary with no supervising parent left behind. Windows has no
//! exec-replace primitive; there the child is spawned with inherited
//! stdio and its exit code is propagated.

use crate::cache::CacheLayout;
use crate::platform::Platform;
use crate::provision::{ProvisionRequest, Provisioner};
use crate::{Error, Result};
use std::convert::Infallible;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Resolve (provisioning if needed) and launch a logical binary with the
/// given arguments.
///
/// Does not return on success. The error type covers every failure mode
/// of the pipeline plus the fatal process-start failure.
pub fn run(binary: &str, args: &[OsString]) -> Result<Infallible> {
    let layout = CacheLayout::resolve()?;
    let platform = Platform::detect()?;
    let request = ProvisionRequest::current();

    let paths = Provisioner::new(layout, platform).ensure(&request)?;
    let path = paths
        .get(binary)
        .ok_or_else(|| Error::provision(format!("unknown binary '{binary}'")))?;

    // The marker promises a complete install; verify this binary anyway
    // before handing the process over to it.
    if !path.exists() {
        return Err(Error::provision(format!(
            "binary not found after provisioning: {}",
            path.display()
        )));
    }

    debug!(binary, path = %path.display(), "Delegating");
    exec(path, binary, args)
}

#[cfg(unix)]
fn exec(path: &Path, binary: &str, args: &[OsString]) -> Result<Infallible> {
    use std::os::unix::process::CommandExt;

    // exec only returns on failure.
    let err = Command::new(path).args(args).exec();
    Err(Error::Exec {
        binary: binary.to_string(),
        source: err,
    })
}

#[cfg(windows)]
fn exec(path: &Path, binary: &str, args: &[OsString]) -> Result<Infallible> {
    let status = Command::new(path)
        .args(args)
        .status()
        .map_err(|source| Error::Exec {
            binary: binary.to_string(),
            source,
        })?;
    std::process::exit(status.code().unwrap_or(1));
}
