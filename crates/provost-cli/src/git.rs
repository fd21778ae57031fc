//! Repository deployment via the system `git` binary.

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Clones `url` into `dest` with `git clone`.
///
/// Stdout and stderr are inherited so clone progress reaches the operator
/// unchanged. The destination must be empty (a freshly created server
/// directory is).
///
/// # Errors
///
/// Returns an error if the `git` binary cannot be launched or the clone
/// exits with a non-zero status.
pub fn clone_repository(url: &str, dest: &Path) -> Result<()> {
    info!(url, dest = %dest.display(), "running git clone");

    let status = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(dest)
        .status()
        .with_context(|| format!("failed to launch git to clone '{url}'"))?;

    if !status.success() {
        bail!("git clone of '{url}' failed with {status}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_clone_nonexistent_source_fails() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = temp.path().join("checkout");

        let result = clone_repository("/nonexistent/repository/path", &dest);
        assert!(result.is_err());
    }

    #[test]
    fn test_clone_local_repository() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().expect("failed to create temp dir");
        let source = temp.path().join("source.git");
        let status = Command::new("git")
            .arg("init")
            .arg("--bare")
            .arg(&source)
            .status()
            .expect("failed to run git init");
        assert!(status.success());

        let dest = temp.path().join("checkout");
        clone_repository(source.to_str().unwrap(), &dest).expect("clone should succeed");
        assert!(dest.join(".git").is_dir());
    }

    #[test]
    fn test_clone_error_names_url() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = temp.path().join("checkout");

        let err = clone_repository("/no/such/repo", &dest).unwrap_err();
        assert!(format!("{err:?}").contains("/no/such/repo"));
    }
}
