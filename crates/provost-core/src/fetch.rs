//! Remote resource acquisition.
//!
//! ZIP readers need random access (the central directory lives at the end
//! of the stream), so a plain forward body stream is not enough: the
//! response is spooled to a named temporary file first. The spool is owned
//! by the returned [`FetchedArchive`] and removed when it drops, on every
//! exit path.

use crate::FetchOptions;
use crate::ProvisionError;
use crate::Result;
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;
use tracing::info;

/// A remote archive spooled to local temporary storage.
///
/// Created per deployment run, consumed once, then discarded. Dropping the
/// handle deletes the backing temporary file.
#[derive(Debug)]
pub struct FetchedArchive {
    url: String,
    spool: NamedTempFile,
}

impl FetchedArchive {
    /// Returns the URL this archive was fetched from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the path of the backing temporary file.
    ///
    /// The file disappears when this handle drops; do not hold the path
    /// beyond the handle's lifetime.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.spool.path()
    }

    /// Opens an independent read handle over the spooled bytes, positioned
    /// at the start.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Spool`] if the temporary file cannot be
    /// reopened.
    pub fn open(&self) -> Result<File> {
        self.spool.reopen().map_err(|e| ProvisionError::Spool {
            url: self.url.clone(),
            source: e,
        })
    }
}

/// Fetches a remote archive into local temporary storage.
///
/// Performs one synchronous GET with the transport policy in `options`;
/// there is no retry and no explicit request timeout (large archives on
/// slow links must not be cut off mid-body).
///
/// The URL is expected to be a well-formed HTTP/HTTPS URL; callers validate
/// before handing it over.
///
/// # Errors
///
/// - [`ProvisionError::Fetch`] for transport failures (DNS, refused
///   connection, interrupted body)
/// - [`ProvisionError::FetchStatus`] for non-success HTTP responses
/// - [`ProvisionError::Spool`] when the temporary file cannot be created
///   or written
pub fn fetch_archive(url: &str, options: &FetchOptions) -> Result<FetchedArchive> {
    info!(url, "fetching remote archive");
    let mut response = get_checked(url, options)?;

    let mut spool = NamedTempFile::new().map_err(|e| ProvisionError::Spool {
        url: url.to_string(),
        source: e,
    })?;
    let bytes = response
        .copy_to(spool.as_file_mut())
        .map_err(|e| ProvisionError::Fetch {
            url: url.to_string(),
            source: e,
        })?;
    debug!(url, bytes, spool = %spool.path().display(), "archive spooled");

    Ok(FetchedArchive {
        url: url.to_string(),
        spool,
    })
}

/// Downloads a remote resource directly to `dest`, creating or truncating
/// the file.
///
/// Used for single files that need no inspection (a server icon); unlike
/// [`fetch_archive`] the body goes straight to its final location.
///
/// # Errors
///
/// Same taxonomy as [`fetch_archive`]; local write failures are reported
/// as [`ProvisionError::Spool`] naming the URL.
pub fn download_to(url: &str, dest: &Path, options: &FetchOptions) -> Result<u64> {
    info!(url, dest = %dest.display(), "downloading file");
    let mut response = get_checked(url, options)?;

    let mut file = File::create(dest).map_err(|e| ProvisionError::Spool {
        url: url.to_string(),
        source: e,
    })?;
    let bytes = response
        .copy_to(&mut file)
        .map_err(|e| ProvisionError::Fetch {
            url: url.to_string(),
            source: e,
        })?;
    debug!(url, bytes, "download complete");
    Ok(bytes)
}

/// Builds a client for `options`, sends one GET, and checks the status.
fn get_checked(url: &str, options: &FetchOptions) -> Result<reqwest::blocking::Response> {
    let client = reqwest::blocking::Client::builder()
        .danger_accept_invalid_certs(options.accept_invalid_certs)
        // The blocking client applies a 30s total-request timeout by
        // default, which a large archive can easily exceed.
        .timeout(None)
        .build()
        .map_err(|e| ProvisionError::Fetch {
            url: url.to_string(),
            source: e,
        })?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| ProvisionError::Fetch {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProvisionError::FetchStatus {
            url: url.to_string(),
            status,
        });
    }
    Ok(response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::StaticServer;
    use std::io::Read;

    #[test]
    fn test_fetch_archive_spools_body() {
        let server = StaticServer::serve(vec![("/pack.zip", b"not really zip bytes".to_vec())]);
        let url = server.url("/pack.zip");

        let archive = fetch_archive(&url, &FetchOptions::default()).unwrap();
        assert_eq!(archive.url(), url);

        let mut content = Vec::new();
        archive.open().unwrap().read_to_end(&mut content).unwrap();
        assert_eq!(content, b"not really zip bytes");
    }

    #[test]
    fn test_fetch_archive_open_rewinds() {
        let server = StaticServer::serve(vec![("/a", b"abc".to_vec())]);
        let archive = fetch_archive(&server.url("/a"), &FetchOptions::default()).unwrap();

        for _ in 0..2 {
            let mut content = String::new();
            archive
                .open()
                .unwrap()
                .read_to_string(&mut content)
                .unwrap();
            assert_eq!(content, "abc");
        }
    }

    #[test]
    fn test_fetch_archive_http_error_status() {
        let server = StaticServer::serve(vec![("/exists", b"x".to_vec())]);
        let url = server.url("/missing");

        let err = fetch_archive(&url, &FetchOptions::default()).unwrap_err();
        match err {
            ProvisionError::FetchStatus { url: u, status } => {
                assert_eq!(u, url);
                assert_eq!(status.as_u16(), 404);
            }
            other => panic!("expected FetchStatus, got {other}"),
        }
    }

    #[test]
    fn test_fetch_archive_connection_refused() {
        // Bind then drop a listener so the port is very likely closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}/pack.zip");

        let err = fetch_archive(&url, &FetchOptions::default()).unwrap_err();
        assert!(matches!(err, ProvisionError::Fetch { .. }));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_spool_removed_on_drop() {
        let server = StaticServer::serve(vec![("/pack.zip", b"payload".to_vec())]);
        let archive = fetch_archive(&server.url("/pack.zip"), &FetchOptions::default()).unwrap();

        let spool_path = archive.path().to_path_buf();
        assert!(spool_path.exists());
        drop(archive);
        assert!(!spool_path.exists());
    }

    #[test]
    fn test_download_to_writes_file() {
        let server = StaticServer::serve(vec![("/icon.png", b"\x89PNG fake".to_vec())]);
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("server-icon.png");

        let bytes = download_to(&server.url("/icon.png"), &dest, &FetchOptions::default()).unwrap();
        assert_eq!(bytes, 9);
        assert_eq!(std::fs::read(&dest).unwrap(), b"\x89PNG fake");
    }

    #[test]
    fn test_download_to_error_status_leaves_no_file() {
        let server = StaticServer::serve(vec![("/icon.png", b"x".to_vec())]);
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("server-icon.png");

        let err = download_to(&server.url("/other.png"), &dest, &FetchOptions::default());
        assert!(matches!(err, Err(ProvisionError::FetchStatus { .. })));
        assert!(!dest.exists());
    }
}
