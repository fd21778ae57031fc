//! Validated relative entry path type.

use crate::ProvisionError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// A validated, destination-relative path derived from an archive entry
/// name.
///
/// Archive entry names are untrusted input from a third-party URL, and by
/// the time they reach the filesystem they may also have been rewritten by
/// top-level-directory normalization. `EntryPath::parse` is therefore the
/// only route from an entry name to a filesystem join: it rejects anything
/// that could place a write outside the destination root.
///
/// # Validation Rules
///
/// - No NUL bytes anywhere in the name
/// - No absolute paths (leading `/`, or a drive prefix on Windows)
/// - No `..` components
/// - `.` components and empty components (`a//b`) are dropped
///
/// Backslashes are ordinary name bytes on Unix, exactly as a ZIP tool that
/// wrote `dir\file` intended.
///
/// # Examples
///
/// ```
/// use provost_core::types::EntryPath;
///
/// let entry = EntryPath::parse("mods/a.jar")?;
/// assert_eq!(entry.as_path().to_str(), Some("mods/a.jar"));
///
/// assert!(EntryPath::parse("../escape").is_err());
/// assert!(EntryPath::parse("/etc/passwd").is_err());
/// # Ok::<(), provost_core::ProvisionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPath(PathBuf);

impl EntryPath {
    /// Parses and validates an entry name into a destination-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::PathTraversal`] if the name contains a NUL
    /// byte, is absolute, or contains a `..` component. The offending
    /// original name is carried in the error.
    pub fn parse(name: &str) -> Result<Self> {
        if name.contains('\0') {
            return Err(ProvisionError::PathTraversal {
                path: PathBuf::from(name.replace('\0', "\\0")),
            });
        }

        let mut normalized = PathBuf::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                // "./" segments carry no meaning inside an archive
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ProvisionError::PathTraversal {
                        path: PathBuf::from(name),
                    });
                }
            }
        }

        Ok(Self(normalized))
    }

    /// Returns the validated path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns `true` if the name normalized to nothing at all.
    ///
    /// This happens when a stripped wrapper-directory entry (`pack/`)
    /// loses its only segment; callers skip such entries because the
    /// destination root already exists.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.as_os_str().is_empty()
    }
}
