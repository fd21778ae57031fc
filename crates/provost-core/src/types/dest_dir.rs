//! Validated destination directory type.

use crate::ProvisionError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

/// A validated destination root for archive extraction.
///
/// This type represents a directory that has been validated to:
/// - Exist on the filesystem
/// - Be a directory (not a file)
/// - Be writable by the current process
/// - Be represented as an absolute canonical path
///
/// # Security Properties
///
/// Every extracted entry path is produced by joining a validated
/// [`EntryPath`](super::EntryPath) onto the canonical root held here, so a
/// `DestDir` constructed once bounds everything the extractor can write.
/// There is an unavoidable time-of-check gap between the validation calls
/// and later writes; canonicalizing up front and validating entry names
/// against the canonical root is the mitigation this crate applies.
///
/// # Examples
///
/// ```no_run
/// use provost_core::types::DestDir;
/// use std::path::PathBuf;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new(PathBuf::from("/srv/server"))?;
/// println!("extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Creates a new `DestDir` after validating the path.
    ///
    /// Validation: the path must exist, be a directory, canonicalize to an
    /// absolute path, and be writable by the effective user. The
    /// writability probe runs before any network traffic so a bad mount
    /// fails the run immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist
    /// - The path exists but is not a directory
    /// - The path cannot be canonicalized
    /// - The directory is not writable (on Unix)
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(ProvisionError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("destination directory does not exist: {}", path.display()),
            )));
        }

        if !path.is_dir() {
            return Err(ProvisionError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            ProvisionError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {}", path.display(), e),
            ))
        })?;

        // Check effective write permission with access(2); a read-only
        // volume should fail here, not after the archive is downloaded.
        #[cfg(unix)]
        {
            use std::ffi::CString;
            use std::os::unix::ffi::OsStrExt;

            let path_cstring = CString::new(canonical.as_os_str().as_bytes()).map_err(|_| {
                ProvisionError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path contains null byte",
                ))
            })?;

            // SAFETY: access() is safe to call with a valid C string.
            // The pointer is valid for the duration of the call and the
            // string is not modified.
            #[allow(unsafe_code)]
            let result = unsafe { libc::access(path_cstring.as_ptr(), libc::W_OK) };

            if result != 0 {
                return Err(ProvisionError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("directory is not writable: {}", canonical.display()),
                )));
            }
        }

        Ok(Self(canonical))
    }

    /// Creates the directory (and missing ancestors) if absent, then
    /// validates it like [`DestDir::new`].
    ///
    /// Deployment destinations are "pre-existing or creatable": a fresh
    /// container volume may not have the tree root yet.
    ///
    /// # Errors
    ///
    /// Returns an error if creation fails or validation of the resulting
    /// directory fails.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path).map_err(|e| {
            ProvisionError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "failed to create destination directory {}: {}",
                    path.display(),
                    e
                ),
            ))
        })?;
        Self::new(path)
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a validated [`EntryPath`](super::EntryPath) onto this root to
    /// produce the final on-disk path for an archive entry.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use provost_core::types::DestDir;
    /// use provost_core::types::EntryPath;
    /// use std::path::PathBuf;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let dest = DestDir::new(PathBuf::from("/srv/server"))?;
    /// let entry = EntryPath::parse("mods/a.jar")?;
    ///
    /// let final_path = dest.join(&entry);
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    #[must_use]
    pub fn join(&self, entry: &super::EntryPath) -> PathBuf {
        self.0.join(entry.as_path())
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}
