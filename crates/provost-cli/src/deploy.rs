//! Deployment orchestration.
//!
//! Resolves the destination directory, dispatches on the deployment type,
//! and runs post-deployment file initialization for archive deployments.

use crate::config::DeploymentKind;
use crate::config::Settings;
use crate::error::add_provision_context;
use crate::git;
use crate::server_files;
use anyhow::Result;
use provost_core::DestDir;
use provost_core::FetchOptions;
use provost_core::provision_archive;
use tracing::info;

/// Runs one provisioning pass with the given settings.
///
/// # Errors
///
/// Returns an error if the destination cannot be prepared, the deployment
/// itself fails, or file initialization fails.
pub fn run(settings: &Settings) -> Result<()> {
    let dest = add_provision_context(DestDir::create(settings.server_dir.clone()))?;

    match settings.deployment {
        DeploymentKind::Zip => {
            info!(url = %settings.url, dest = %dest.as_path().display(), "deploying archive");

            // Modpack hosts are routinely served with certificates the
            // container image cannot verify; the archive GET tolerates that.
            let report = add_provision_context(provision_archive(
                &settings.url,
                &dest,
                &FetchOptions::relaxed_trust(),
            ))?;

            if let Some(root) = &report.stripped_root {
                info!(root = root.as_str(), "removed shared top-level directory");
            }
            info!(
                files = report.files_extracted,
                directories = report.directories_created,
                bytes = report.bytes_written,
                elapsed = ?report.duration,
                "archive extracted"
            );

            server_files::initialize(&dest, &settings.files_init, &settings.start_script_name)?;
        }
        DeploymentKind::Git => {
            info!(url = %settings.url, dest = %dest.as_path().display(), "deploying repository");
            git::clone_repository(&settings.url, dest.as_path())?;
        }
    }

    info!(dest = %dest.as_path().display(), "server provisioned");
    Ok(())
}
