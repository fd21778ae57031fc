//! Initial server files written after a successful archive deployment.
//!
//! Repository deployments skip this step; a cloned repository is expected
//! to carry its own files.

use crate::config::FilesInit;
use crate::error::add_provision_context;
use anyhow::Context;
use anyhow::Result;
use provost_core::DestDir;
use provost_core::EntryPath;
use provost_core::FetchOptions;
use provost_core::download_to;
use std::fs;
use tracing::info;

const EULA_FILE: &str = "eula.txt";
const ICON_FILE: &str = "server-icon.png";
const PROPERTIES_FILE: &str = "server.properties";

/// Writes the initial server files into `dest`.
///
/// Order: `eula.txt`, the optional start script, the optional icon, then
/// `server.properties`. A failure aborts the run without rolling back the
/// files already written.
///
/// # Errors
///
/// Returns an error if any file cannot be written or the icon download
/// fails.
pub fn initialize(dest: &DestDir, files: &FilesInit, start_script_name: &EntryPath) -> Result<()> {
    write_eula(dest)?;
    write_start_script(dest, files, start_script_name)?;
    download_icon(dest, files)?;
    write_properties(dest, files)?;
    Ok(())
}

fn write_eula(dest: &DestDir) -> Result<()> {
    let path = dest.as_path().join(EULA_FILE);
    fs::write(&path, "eula=true\n")
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("accepted EULA");
    Ok(())
}

fn write_start_script(dest: &DestDir, files: &FilesInit, name: &EntryPath) -> Result<()> {
    if files.custom_start_script.is_empty() {
        return Ok(());
    }

    let path = dest.join(name);
    fs::write(&path, &files.custom_start_script)
        .with_context(|| format!("failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("failed to make {} executable", path.display()))?;
    }

    info!(script = %path.display(), "wrote start script");
    Ok(())
}

fn download_icon(dest: &DestDir, files: &FilesInit) -> Result<()> {
    if files.server_icon_url.is_empty() {
        return Ok(());
    }

    // Unlike the archive fetch, the icon is fetched with certificate
    // verification left on.
    let path = dest.as_path().join(ICON_FILE);
    let bytes = add_provision_context(download_to(
        &files.server_icon_url,
        &path,
        &FetchOptions::default(),
    ))
    .with_context(|| {
        format!(
            "failed to download server icon from '{}'",
            files.server_icon_url
        )
    })?;

    info!(bytes, "wrote {ICON_FILE}");
    Ok(())
}

fn write_properties(dest: &DestDir, files: &FilesInit) -> Result<()> {
    let path = dest.as_path().join(PROPERTIES_FILE);
    fs::write(&path, properties_content(files))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {PROPERTIES_FILE}");
    Ok(())
}

/// Renders `server.properties` with one `key=value` line per setting.
///
/// The key order is fixed so reprovisioning produces byte-identical files.
fn properties_content(files: &FilesInit) -> String {
    format!(
        "motd={}\n\
         enable-command-block={}\n\
         online-mode={}\n\
         allow-flight={}\n\
         max-tick-time={}\n\
         max-players={}\n\
         spawn-protection={}\n\
         view-distance={}\n\
         simulation-distance={}\n",
        files.motd,
        files.enable_command_block,
        files.online_mode,
        files.allow_flight,
        files.max_tick_time,
        files.max_players,
        files.spawn_protection,
        files.view_distance,
        files.simulation_distance,
    )
}
