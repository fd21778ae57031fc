//! Environment-driven runtime configuration.
//!
//! Every input arrives through a `PROVOST_*` environment variable; an
//! empty value is treated the same as an unset one. Validation failures
//! abort startup with a message naming the offending variable.

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use provost_core::EntryPath;
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

const DEPLOYMENT_TYPE_VAR: &str = "PROVOST_DEPLOYMENT_TYPE";
const DEPLOYMENT_URL_VAR: &str = "PROVOST_DEPLOYMENT_URL";
const FILES_INIT_VAR: &str = "PROVOST_FILES_INIT";
const START_SCRIPT_VAR: &str = "PROVOST_START_SCRIPT_NAME";
const SERVER_DIR_VAR: &str = "PROVOST_SERVER_DIR";

const DEFAULT_START_SCRIPT: &str = "start.sh";
const DEFAULT_SERVER_DIR: &str = "/srv/server";

/// Mechanism used to place server files into the destination tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentKind {
    /// Download a zip archive and extract it.
    Zip,
    /// Clone a git repository.
    Git,
}

impl DeploymentKind {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "ZIP" => Ok(Self::Zip),
            "GIT" => Ok(Self::Git),
            other => bail!("{DEPLOYMENT_TYPE_VAR} must be ZIP or GIT, got '{other}'"),
        }
    }
}

/// Initial server file settings, decoded from the `PROVOST_FILES_INIT`
/// JSON object.
///
/// Every field is optional; absent fields take the defaults below and
/// unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilesInit {
    /// Start script contents; empty means no script is written.
    pub custom_start_script: String,
    /// URL of an icon to download as `server-icon.png`; empty means none.
    pub server_icon_url: String,
    /// Server list message of the day.
    pub motd: String,
    /// Whether command blocks are enabled.
    pub enable_command_block: bool,
    /// Whether player identity is verified against the account service.
    pub online_mode: bool,
    /// Whether survival-mode flight is tolerated.
    pub allow_flight: bool,
    /// Watchdog limit in milliseconds; `-1` disables the watchdog.
    pub max_tick_time: i64,
    /// Player slot count.
    pub max_players: u32,
    /// Radius in blocks around spawn that only operators may modify.
    pub spawn_protection: u32,
    /// Server-side view distance in chunks.
    pub view_distance: u32,
    /// Server-side simulation distance in chunks.
    pub simulation_distance: u32,
}

impl Default for FilesInit {
    fn default() -> Self {
        Self {
            custom_start_script: String::new(),
            server_icon_url: String::new(),
            motd: "A §bprovost§r provisioned server".to_owned(),
            enable_command_block: true,
            online_mode: true,
            allow_flight: false,
            max_tick_time: -1,
            max_players: 60,
            spawn_protection: 0,
            view_distance: 10,
            simulation_distance: 9,
        }
    }
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// How the server files are obtained.
    pub deployment: DeploymentKind,
    /// Where they are obtained from.
    pub url: String,
    /// Post-extraction file initialization settings.
    pub files_init: FilesInit,
    /// Sanitized file name for the optional start script.
    pub start_script_name: EntryPath,
    /// Destination tree root; created by the orchestrator if absent.
    pub server_dir: PathBuf,
}

impl Settings {
    /// Reads and validates settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable when a required one is missing
    /// or any value fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let deployment = DeploymentKind::parse(&required(&lookup, DEPLOYMENT_TYPE_VAR)?)?;

        let url = required(&lookup, DEPLOYMENT_URL_VAR)?;
        validate_http_url(&url)?;

        let files_json = required(&lookup, FILES_INIT_VAR)?;
        let files_init: FilesInit = serde_json::from_str(&files_json)
            .with_context(|| format!("{FILES_INIT_VAR} is not a valid JSON object"))?;

        let start_script_name = parse_script_name(
            &optional(&lookup, START_SCRIPT_VAR)
                .unwrap_or_else(|| DEFAULT_START_SCRIPT.to_owned()),
        )?;

        let server_dir = PathBuf::from(
            optional(&lookup, SERVER_DIR_VAR).unwrap_or_else(|| DEFAULT_SERVER_DIR.to_owned()),
        );

        Ok(Self {
            deployment,
            url,
            files_init,
            start_script_name,
            server_dir,
        })
    }
}

/// Looks up a variable, treating empty values as unset.
fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|value| !value.is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    optional(lookup, name)
        .with_context(|| format!("required environment variable {name} is not set"))
}

fn validate_http_url(raw: &str) -> Result<()> {
    let parsed = Url::parse(raw)
        .with_context(|| format!("{DEPLOYMENT_URL_VAR} is not a valid URL: '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "{DEPLOYMENT_URL_VAR} must use http or https, got '{}'",
            parsed.scheme()
        );
    }
    if parsed.host_str().is_none() {
        bail!("{DEPLOYMENT_URL_VAR} has no host: '{raw}'");
    }
    Ok(())
}

fn parse_script_name(raw: &str) -> Result<EntryPath> {
    // A leading slash is an operator convenience, not an absolute path.
    let name = EntryPath::parse(raw.trim_start_matches('/'))
        .with_context(|| format!("{START_SCRIPT_VAR} is not a safe file name: '{raw}'"))?;
    if name.is_empty() {
        bail!("{START_SCRIPT_VAR} names no file: '{raw}'");
    }
    Ok(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| map.get(name).map(|value| (*value).to_owned())
    }

    fn minimal_zip_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("PROVOST_DEPLOYMENT_TYPE", "ZIP"),
            ("PROVOST_DEPLOYMENT_URL", "http://example.com/pack.zip"),
            ("PROVOST_FILES_INIT", "{}"),
        ]
    }

    #[test]
    fn test_minimal_zip_settings() {
        let vars = minimal_zip_vars();
        let settings = Settings::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(settings.deployment, DeploymentKind::Zip);
        assert_eq!(settings.url, "http://example.com/pack.zip");
        assert_eq!(settings.start_script_name.as_path(), Path::new("start.sh"));
        assert_eq!(settings.server_dir, PathBuf::from("/srv/server"));
    }

    #[test]
    fn test_git_deployment_kind() {
        let vars = vec![
            ("PROVOST_DEPLOYMENT_TYPE", "GIT"),
            ("PROVOST_DEPLOYMENT_URL", "https://example.com/repo.git"),
            ("PROVOST_FILES_INIT", "{}"),
        ];
        let settings = Settings::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(settings.deployment, DeploymentKind::Git);
    }

    #[test]
    fn test_missing_deployment_type_names_variable() {
        let vars = vec![
            ("PROVOST_DEPLOYMENT_URL", "http://example.com/pack.zip"),
            ("PROVOST_FILES_INIT", "{}"),
        ];
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("PROVOST_DEPLOYMENT_TYPE"));
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let mut vars = minimal_zip_vars();
        vars[0] = ("PROVOST_DEPLOYMENT_TYPE", "");
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("PROVOST_DEPLOYMENT_TYPE"));
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn test_unknown_deployment_type_rejected() {
        let mut vars = minimal_zip_vars();
        vars[0] = ("PROVOST_DEPLOYMENT_TYPE", "TARBALL");
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("ZIP or GIT"));
        assert!(err.to_string().contains("TARBALL"));
    }

    #[test]
    fn test_deployment_type_is_case_sensitive() {
        let mut vars = minimal_zip_vars();
        vars[0] = ("PROVOST_DEPLOYMENT_TYPE", "zip");
        assert!(Settings::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_missing_url_names_variable() {
        let vars = vec![
            ("PROVOST_DEPLOYMENT_TYPE", "ZIP"),
            ("PROVOST_FILES_INIT", "{}"),
        ];
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("PROVOST_DEPLOYMENT_URL"));
    }

    #[test]
    fn test_unparseable_url_rejected() {
        let mut vars = minimal_zip_vars();
        vars[1] = ("PROVOST_DEPLOYMENT_URL", "not a url");
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("PROVOST_DEPLOYMENT_URL"));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut vars = minimal_zip_vars();
        vars[1] = ("PROVOST_DEPLOYMENT_URL", "ftp://example.com/pack.zip");
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_missing_files_init_names_variable() {
        let vars = vec![
            ("PROVOST_DEPLOYMENT_TYPE", "ZIP"),
            ("PROVOST_DEPLOYMENT_URL", "http://example.com/pack.zip"),
        ];
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("PROVOST_FILES_INIT"));
    }

    #[test]
    fn test_malformed_files_init_rejected() {
        let mut vars = minimal_zip_vars();
        vars[2] = ("PROVOST_FILES_INIT", "{not json");
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("PROVOST_FILES_INIT"));
    }

    #[test]
    fn test_files_init_defaults() {
        let vars = minimal_zip_vars();
        let settings = Settings::from_lookup(lookup(&vars)).unwrap();
        let files = settings.files_init;

        assert_eq!(files.custom_start_script, "");
        assert_eq!(files.server_icon_url, "");
        assert_eq!(files.motd, "A §bprovost§r provisioned server");
        assert!(files.enable_command_block);
        assert!(files.online_mode);
        assert!(!files.allow_flight);
        assert_eq!(files.max_tick_time, -1);
        assert_eq!(files.max_players, 60);
        assert_eq!(files.spawn_protection, 0);
        assert_eq!(files.view_distance, 10);
        assert_eq!(files.simulation_distance, 9);
    }

    #[test]
    fn test_files_init_overrides_and_unknown_fields() {
        let mut vars = minimal_zip_vars();
        vars[2] = (
            "PROVOST_FILES_INIT",
            r#"{"motd":"Welcome","maxPlayers":8,"maxTickTime":60000,"bogusField":true}"#,
        );
        let settings = Settings::from_lookup(lookup(&vars)).unwrap();
        let files = settings.files_init;

        assert_eq!(files.motd, "Welcome");
        assert_eq!(files.max_players, 8);
        assert_eq!(files.max_tick_time, 60000);
        // Untouched fields keep their defaults.
        assert!(files.online_mode);
        assert_eq!(files.view_distance, 10);
    }

    #[test]
    fn test_start_script_leading_slash_stripped() {
        let mut vars = minimal_zip_vars();
        vars.push(("PROVOST_START_SCRIPT_NAME", "/run.sh"));
        let settings = Settings::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(settings.start_script_name.as_path(), Path::new("run.sh"));
    }

    #[test]
    fn test_start_script_traversal_rejected() {
        let mut vars = minimal_zip_vars();
        vars.push(("PROVOST_START_SCRIPT_NAME", "../run.sh"));
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("PROVOST_START_SCRIPT_NAME"));
    }

    #[test]
    fn test_start_script_all_slashes_rejected() {
        let mut vars = minimal_zip_vars();
        vars.push(("PROVOST_START_SCRIPT_NAME", "///"));
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("names no file"));
    }

    #[test]
    fn test_custom_server_dir() {
        let mut vars = minimal_zip_vars();
        vars.push(("PROVOST_SERVER_DIR", "/data/world"));
        let settings = Settings::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(settings.server_dir, PathBuf::from("/data/world"));
    }
}
