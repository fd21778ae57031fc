//! Error types for archive provisioning operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ProvisionError`.
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Errors that can occur while fetching or extracting a deployment archive.
///
/// None of these are recovered internally: the first failure aborts the
/// whole provisioning run and surfaces to the caller, which decides policy
/// (typically log and exit non-zero).
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Network or transport failure while fetching a remote resource.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        /// The URL that was being fetched.
        url: String,
        /// The underlying transport error.
        source: reqwest::Error,
    },

    /// The remote server answered with a non-success HTTP status.
    #[error("request to {url} returned HTTP {status}")]
    FetchStatus {
        /// The URL that was being fetched.
        url: String,
        /// The status line of the response.
        status: reqwest::StatusCode,
    },

    /// Local storage failure while saving a download to disk, whether to
    /// the temporary spool or to a final location.
    #[error("failed to save download of {url}: {source}")]
    Spool {
        /// The URL whose body was being written.
        url: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The downloaded bytes are not a readable ZIP archive.
    #[error("invalid archive: {0}")]
    ArchiveFormat(String),

    /// A directory or file could not be materialized at the destination.
    #[error("failed to extract to {path}: {source}")]
    Extraction {
        /// The destination path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An entry name would escape the destination root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending entry name.
        path: PathBuf,
    },

    /// I/O operation failed outside the per-entry extraction loop.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProvisionError {
    /// Returns `true` if this error occurred while retrieving the remote
    /// resource rather than while unpacking it.
    ///
    /// Fetch-side failures (DNS, refused connections, HTTP error statuses,
    /// spool I/O) are the ones an operator can usually fix without touching
    /// the archive itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use provost_core::ProvisionError;
    /// use std::path::PathBuf;
    ///
    /// let err = ProvisionError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(!err.is_fetch_failure());
    /// ```
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::FetchStatus { .. } | Self::Spool { .. }
        )
    }

    /// Returns `true` if this error means the archive tried to write
    /// outside the destination tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use provost_core::ProvisionError;
    /// use std::path::PathBuf;
    ///
    /// let err = ProvisionError::PathTraversal {
    ///     path: PathBuf::from("../escape"),
    /// };
    /// assert!(err.is_integrity_violation());
    ///
    /// let err = ProvisionError::ArchiveFormat("truncated".to_string());
    /// assert!(!err.is_integrity_violation());
    /// ```
    #[must_use]
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::PathTraversal { .. })
    }

    /// Returns the URL involved in this error, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Fetch { url, .. } | Self::FetchStatus { url, .. } | Self::Spool { url, .. } => {
                Some(url)
            }
            _ => None,
        }
    }

    /// Returns the destination or entry path involved in this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Extraction { path, .. } | Self::PathTraversal { path } => Some(path),
            _ => None,
        }
    }
}
