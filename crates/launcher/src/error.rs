//! Error types for launcher operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for launcher operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while provisioning or delegating to a binary.
///
/// Every variant is fatal: nothing in the pipeline retries or downgrades
/// an error to a warning. Failures propagate to the binary entry points,
/// which print the message and exit non-zero.
#[derive(Error, Debug)]
pub enum Error {
    /// The host OS or CPU architecture has no release mapping.
    #[error("unsupported platform: {os}-{arch}")]
    UnsupportedPlatform {
        /// Detected operating system string.
        os: String,
        /// Detected architecture string.
        arch: String,
    },

    /// Transport or HTTP failure while fetching a release archive.
    #[error("failed to download {url}: {message}")]
    Download {
        /// The URL that failed.
        url: String,
        /// Error message from the transport.
        message: String,
    },

    /// The downloaded archive is malformed or has an unexpected layout.
    #[error("failed to extract archive: {0}")]
    Extraction(String),

    /// An expected binary is absent during or after installation.
    #[error("provisioning failed: {0}")]
    Provision(String),

    /// A cache directory could not be created or written.
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        /// The path that could not be used.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Replacing the process image with the target binary failed.
    #[error("failed to exec {binary}: {source}")]
    Exec {
        /// Logical name of the binary being launched.
        binary: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// IO error without a more specific classification.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unsupported platform error.
    #[must_use]
    pub fn unsupported_platform(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Create a download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Create a provisioning error.
    #[must_use]
    pub fn provision(message: impl Into<String>) -> Self {
        Self::Provision(message.into())
    }

    /// Create a filesystem error for the given path.
    #[must_use]
    pub fn filesystem(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
