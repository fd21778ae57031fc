//! High-level public API for archive provisioning.

use crate::ExtractionReport;
use crate::FetchOptions;
use crate::Result;
use crate::extract::extract_archive;
use crate::fetch::fetch_archive;
use crate::types::DestDir;

/// Fetches a remote ZIP archive and extracts it into `dest`.
///
/// This is the main high-level API: one GET spooled to temporary storage,
/// one pass over the entry names to decide top-level-directory stripping,
/// then extraction in central-directory order. The spool file is scoped to
/// this call and removed before it returns, on success and on error alike.
///
/// The operation runs strictly sequentially and assumes exclusive ownership
/// of `dest` for its duration; callers serialize runs against one
/// destination.
///
/// # Errors
///
/// Returns the first failure of any stage: [`crate::ProvisionError::Fetch`],
/// [`crate::ProvisionError::FetchStatus`] or [`crate::ProvisionError::Spool`]
/// while retrieving, [`crate::ProvisionError::ArchiveFormat`],
/// [`crate::ProvisionError::PathTraversal`] or
/// [`crate::ProvisionError::Extraction`] while unpacking. Nothing is retried
/// and files already written stay in place.
///
/// # Examples
///
/// ```no_run
/// use provost_core::FetchOptions;
/// use provost_core::provision_archive;
/// use provost_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("/srv/server")?;
/// let report = provision_archive(
///     "https://mirror.example/pack.zip",
///     &dest,
///     &FetchOptions::relaxed_trust(),
/// )?;
/// println!("extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn provision_archive(
    url: &str,
    dest: &DestDir,
    options: &FetchOptions,
) -> Result<ExtractionReport> {
    let archive = fetch_archive(url, options)?;
    let reader = archive.open()?;
    extract_archive(reader, dest)
}
