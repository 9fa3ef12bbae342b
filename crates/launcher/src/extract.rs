//! Archive extraction for release downloads.
//!
//! Archives are either tar+gzip (Darwin, Linux) or zip (Windows), chosen
//! by file extension. Permission bits from the archive are not trusted;
//! the provisioner reapplies execute bits after installation.

use crate::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Unpack an archive into `dest`, dispatching on the file extension.
///
/// # Errors
///
/// Returns [`Error::Extraction`] for unrecognized or malformed archives.
pub fn unpack(archive: &Path, dest: &Path) -> Result<()> {
    let name = archive.file_name().and_then(|n| n.to_str()).unwrap_or("");
    debug!(?archive, ?dest, "Extracting archive");

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        unpack_tar_gz(archive, dest)
    } else if name.ends_with(".zip") {
        unpack_zip(archive, dest)
    } else {
        Err(Error::extraction(format!(
            "unrecognized archive format: {name}"
        )))
    }
}

fn unpack_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).map_err(|e| Error::extraction(format!("open archive: {e}")))?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));
    tar.unpack(dest)
        .map_err(|e| Error::extraction(format!("unpack tar.gz: {e}")))
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).map_err(|e| Error::extraction(format!("open archive: {e}")))?;
    let mut zip =
        zip::ZipArchive::new(file).map_err(|e| Error::extraction(format!("open zip: {e}")))?;
    zip.extract(dest)
        .map_err(|e| Error::extraction(format!("unpack zip: {e}")))
}

/// Locate the single top-level extracted directory named `<tool>-*`.
///
/// # Errors
///
/// Returns [`Error::Extraction`] when zero or more than one such
/// directory is found.
pub fn locate_tool_dir(root: &Path, tool: &str) -> Result<PathBuf> {
    let prefix = format!("{tool}-");
    let mut matches: Vec<PathBuf> = Vec::new();

    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|n| n.starts_with(&prefix))
        {
            matches.push(path);
        }
    }

    match matches.as_slice() {
        [single] => Ok(single.clone()),
        [] => Err(Error::extraction(format!(
            "no '{prefix}*' directory found in archive"
        ))),
        many => Err(Error::extraction(format!(
            "ambiguous archive layout: {} '{prefix}*' directories found",
            many.len()
        ))),
    }
}
