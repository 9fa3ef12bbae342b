//! Blocking HTTP download of release archives.

use crate::{Error, Result};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Download `url` to `dest`, streaming the body to disk.
///
/// There is no retry, timeout, or resume: the transfer blocks until it
/// completes or the transport fails.
///
/// # Errors
///
/// Returns [`Error::Download`] on transport failure or a non-success
/// HTTP status.
pub fn download(url: &str, dest: &Path) -> Result<()> {
    debug!(%url, "Downloading release archive");

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("grit-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::download(url, e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| Error::download(url, e.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::download(url, format!("HTTP {}", response.status())));
    }

    let mut file = File::create(dest)?;
    response
        .copy_to(&mut file)
        .map_err(|e| Error::download(url, e.to_string()))?;

    debug!(?dest, "Download complete");
    Ok(())
}
