//! Error conversion utilities for the CLI.
//!
//! Converts provost-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::Result;
use anyhow::anyhow;
use provost_core::ProvisionError;

/// Converts `ProvisionError` to a user-friendly anyhow error with context.
pub fn convert_provision_error(err: ProvisionError) -> anyhow::Error {
    match err {
        ProvisionError::Fetch { url, source } => {
            anyhow!(
                "Failed to download '{url}': {source}\n\
                 HINT: Check the deployment URL and network connectivity."
            )
        }
        ProvisionError::FetchStatus { url, status } => {
            anyhow!(
                "Server answered HTTP {status} for '{url}'\n\
                 HINT: Verify the URL points at a downloadable file."
            )
        }
        ProvisionError::Spool { url, source } => {
            anyhow!(
                "Failed to store the download of '{url}': {source}\n\
                 HINT: Check free space in the temporary directory."
            )
        }
        ProvisionError::ArchiveFormat(reason) => {
            anyhow!(
                "Downloaded file is not a usable zip archive: {reason}\n\
                 HINT: The URL must point at a zip file, not an HTML page or a redirect."
            )
        }
        ProvisionError::PathTraversal { path } => {
            anyhow!(
                "Security violation: archive entry '{}' escapes the server directory\n\
                 HINT: This archive may be malicious. Do not deploy from untrusted sources.",
                path.display()
            )
        }
        ProvisionError::Extraction { path, source } => {
            anyhow!(
                "Failed to extract '{}': {source}\n\
                 HINT: The archive may be corrupted, or the disk full.",
                path.display()
            )
        }
        err @ ProvisionError::Io(_) => {
            anyhow::Error::from(err).context("server provisioning failed")
        }
    }
}

/// Maps a core result into an operator-facing anyhow result.
pub fn add_provision_context<T>(result: provost_core::Result<T>) -> Result<T> {
    result.map_err(convert_provision_error)
}
