//! ZIP extraction with top-level-directory normalization.
//!
//! Third-party archives arrive in two shapes: flat (`mods/…`, `config/…`)
//! or wrapped in a single folder the packager happened to zip
//! (`pack/mods/…`, `pack/config/…`). The extractor scans the entry names
//! once; when every entry shares the same leading directory it strips that
//! one segment from every name, so both shapes produce the same destination
//! tree. Anything else extracts verbatim.

use crate::ExtractionReport;
use crate::ProvisionError;
use crate::Result;
use crate::types::DestDir;
use crate::types::EntryPath;
use std::fs;
use std::io::Read;
use std::io::Seek;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;
use zip::ZipArchive;

/// Returns the leading-directory portion of an entry name: the substring up
/// to and including the first `/`. Names with no separator yield `""`.
fn leading_dir(name: &str) -> &str {
    name.find('/').map_or("", |i| &name[..=i])
}

/// Removes the segment up to and including the first `/`. Names with no
/// separator are returned unchanged, so root-level entries survive a strip
/// intact.
fn strip_first_segment(name: &str) -> &str {
    name.find('/').map_or(name, |i| &name[i + 1..])
}

/// Single-pass scan for a shared leading directory.
///
/// Returns the common leading-directory portion when every name agrees on
/// it (possibly `""` when every entry sits at the archive root), or `None`
/// at the first mismatch. The outcome does not depend on iteration order:
/// it is `Some` exactly when all leading portions are identical.
fn shared_top_level<'a, I>(mut names: I) -> Option<String>
where
    I: Iterator<Item = &'a str>,
{
    let first = names.next()?;
    let top = leading_dir(first);
    for name in names {
        if leading_dir(name) != top {
            return None;
        }
    }
    Some(top.to_owned())
}

/// Extracts a ZIP archive into `dest`, stripping a shared top-level
/// directory when the whole archive is wrapped in one.
///
/// Entries are processed in central-directory order. Directory entries are
/// created with default permissions; file entries are created (or
/// truncated) with their stored Unix permission bits applied after the
/// write, masked to `0o777`. The first failure aborts the run and leaves
/// already-written files in place.
///
/// # Errors
///
/// - [`ProvisionError::ArchiveFormat`] when the bytes are not a readable
///   ZIP archive or a member header is malformed
/// - [`ProvisionError::PathTraversal`] when an entry's effective name would
///   escape `dest`
/// - [`ProvisionError::Extraction`] when a directory or file cannot be
///   materialized
///
/// # Examples
///
/// ```no_run
/// use provost_core::extract_archive;
/// use provost_core::types::DestDir;
/// use std::fs::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let archive = File::open("pack.zip")?;
/// let dest = DestDir::new("/srv/server")?;
/// let report = extract_archive(archive, &dest)?;
/// println!("wrote {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<R: Read + Seek>(reader: R, dest: &DestDir) -> Result<ExtractionReport> {
    let start = Instant::now();
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| ProvisionError::ArchiveFormat(format!("failed to open ZIP archive: {e}")))?;

    let mut report = ExtractionReport::new();
    if archive.is_empty() {
        info!("archive has no entries, nothing to extract");
        report.duration = start.elapsed();
        return Ok(report);
    }

    let top = shared_top_level(archive.file_names());
    let strip = top.is_some();
    match top.as_deref() {
        Some("") => debug!("all entries sit at the archive root"),
        Some(dir) => {
            warn!(
                top = dir,
                "all entries share one top-level directory, omitting it during extraction"
            );
        }
        None => info!("entries have differing top-level directories, extracting verbatim"),
    }
    report.stripped_root = top.filter(|t| !t.is_empty());

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| {
            ProvisionError::ArchiveFormat(format!("failed to read ZIP entry: {e}"))
        })?;

        let effective = {
            let raw = entry.name();
            if strip {
                strip_first_segment(raw).to_owned()
            } else {
                raw.to_owned()
            }
        };

        let rel = EntryPath::parse(&effective)?;
        if rel.is_empty() {
            if entry.is_dir() {
                // The wrapper directory itself; the destination root
                // already exists.
                debug!(entry = entry.name(), "skipping wrapper directory entry");
                continue;
            }
            return Err(ProvisionError::PathTraversal {
                path: PathBuf::from(entry.name()),
            });
        }
        let out_path = dest.join(&rel);
        debug_assert!(out_path.starts_with(dest.as_path()));

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| ProvisionError::Extraction {
                path: out_path.clone(),
                source: e,
            })?;
            report.directories_created += 1;
            debug!(path = %out_path.display(), "created directory");
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).map_err(|e| ProvisionError::Extraction {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            let mut outfile =
                fs::File::create(&out_path).map_err(|e| ProvisionError::Extraction {
                    path: out_path.clone(),
                    source: e,
                })?;
            let written =
                std::io::copy(&mut entry, &mut outfile).map_err(|e| ProvisionError::Extraction {
                    path: out_path.clone(),
                    source: e,
                })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;

                // Applied after the write so overwritten files end up with
                // the archive's bits too; setuid/setgid/sticky from an
                // untrusted archive are dropped by the mask.
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o777))
                        .map_err(|e| ProvisionError::Extraction {
                            path: out_path.clone(),
                            source: e,
                        })?;
                }
            }

            report.files_extracted += 1;
            report.bytes_written += written;
            debug!(path = %out_path.display(), bytes = written, "extracted file");
        }
    }

    report.duration = start.elapsed();
    info!(
        files = report.files_extracted,
        directories = report.directories_created,
        bytes = report.bytes_written,
        "extraction complete"
    );
    Ok(report)
}
