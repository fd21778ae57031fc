//! Remote archive acquisition and top-level-directory-normalizing extraction.
//!
//! `provost-core` fetches a ZIP archive from a URL, spools it to temporary
//! storage, and extracts it into a destination tree. When every entry in the
//! archive shares a single top-level directory the extractor strips that one
//! wrapping segment, so archives packaged flat and archives wrapped in a
//! folder both produce the same tree. Entry names are untrusted input and
//! are validated against traversal before anything touches the filesystem.
//!
//! # Examples
//!
//! ```no_run
//! use provost_core::FetchOptions;
//! use provost_core::provision_archive;
//! use provost_core::types::DestDir;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dest = DestDir::create("/srv/server")?;
//! let report = provision_archive(
//!     "https://mirror.example/server-pack.zip",
//!     &dest,
//!     &FetchOptions::relaxed_trust(),
//! )?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod report;
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::provision_archive;
pub use config::FetchOptions;
pub use error::ProvisionError;
pub use error::Result;
pub use extract::extract_archive;
pub use fetch::FetchedArchive;
pub use fetch::download_to;
pub use fetch::fetch_archive;
pub use report::ExtractionReport;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryPath;
