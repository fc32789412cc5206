//! Locating reporter.json.
//!
//! Candidates are tried in order and the first existing file wins:
//! `--config` path, `LSR_CONFIG`, `LSR_CONFIG_DIR/reporter.json`,
//! `$XDG_CONFIG_HOME/lymphoid-synoptic/reporter.json`,
//! `/etc/lymphoid-synoptic/reporter.json`. With none present the built-in
//! defaults apply.

use std::fmt;
use std::path::{Path, PathBuf};

pub const ENV_SETTINGS_PATH: &str = "LSR_CONFIG";
pub const ENV_CONFIG_DIR: &str = "LSR_CONFIG_DIR";

pub const SETTINGS_FILENAME: &str = "reporter.json";

const APP_DIR: &str = "lymphoid-synoptic";

/// Where the settings came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    CliArgument,
    Environment,
    XdgConfig,
    SystemConfig,
    #[default]
    BuiltinDefault,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigSource::CliArgument => "CLI argument",
            ConfigSource::Environment => "environment variable",
            ConfigSource::XdgConfig => "XDG config",
            ConfigSource::SystemConfig => "system config",
            ConfigSource::BuiltinDefault => "builtin default",
        })
    }
}

/// Result of resolution: the file to load, if any, and its origin.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub settings: Option<PathBuf>,
    pub settings_source: ConfigSource,
}

/// Resolve the settings file against the process environment.
pub fn resolve_config(cli_settings: Option<&Path>) -> ConfigPaths {
    let candidates = candidates(cli_settings, |name| std::env::var_os(name).map(PathBuf::from));
    first_existing(candidates)
}

/// Candidate paths in priority order.
fn candidates(
    cli_settings: Option<&Path>,
    env: impl Fn(&str) -> Option<PathBuf>,
) -> Vec<(PathBuf, ConfigSource)> {
    let mut out = Vec::with_capacity(5);
    if let Some(path) = cli_settings {
        out.push((path.to_path_buf(), ConfigSource::CliArgument));
    }
    if let Some(path) = env(ENV_SETTINGS_PATH) {
        out.push((path, ConfigSource::Environment));
    }
    if let Some(dir) = env(ENV_CONFIG_DIR) {
        out.push((dir.join(SETTINGS_FILENAME), ConfigSource::Environment));
    }
    if let Some(dir) = xdg_config_dir() {
        out.push((dir.join(SETTINGS_FILENAME), ConfigSource::XdgConfig));
    }
    out.push((
        system_config_dir().join(SETTINGS_FILENAME),
        ConfigSource::SystemConfig,
    ));
    out
}

fn first_existing(candidates: Vec<(PathBuf, ConfigSource)>) -> ConfigPaths {
    candidates
        .into_iter()
        .find(|(path, _)| path.is_file())
        .map(|(path, source)| ConfigPaths {
            settings: Some(path),
            settings_source: source,
        })
        .unwrap_or_default()
}

/// `$XDG_CONFIG_HOME/lymphoid-synoptic` (or the platform equivalent).
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

pub fn system_config_dir() -> PathBuf {
    Path::new("/etc").join(APP_DIR)
}
