//! Log level and format selection.
//!
//! Precedence, highest first: `LSR_LOG`, then `RUST_LOG` for the level;
//! `LSR_LOG_FORMAT` for the format; then whatever the command line implies.

use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

pub const ENV_LOG_LEVEL: &str = "LSR_LOG";
pub const ENV_RUST_LOG: &str = "RUST_LOG";
pub const ENV_LOG_FORMAT: &str = "LSR_LOG_FORMAT";

/// Shape of stderr log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Jsonl,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            other => Err(format!("unknown log format '{other}' (expected human or jsonl)")),
        }
    }
}

/// Level implied by `-v` count and `--quiet`.
///
/// Zero `-v` means warn: report text on stdout stays readable on a terminal.
pub fn verbosity_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Resolved logging setup for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub format: LogFormat,
    /// Prefix human lines with a timestamp.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: LevelFilter::WARN,
            format: LogFormat::Human,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Start from command-line choices and let the environment override them.
    pub fn resolve(level: LevelFilter, format: LogFormat) -> Self {
        Self::resolve_with(level, format, |name| std::env::var(name).ok())
    }

    fn resolve_with(
        level: LevelFilter,
        format: LogFormat,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let level = env(ENV_LOG_LEVEL)
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .or_else(|| env(ENV_RUST_LOG).and_then(|v| level_from_directives(&v)))
            .unwrap_or(level);
        let format = env(ENV_LOG_FORMAT)
            .and_then(|v| v.parse::<LogFormat>().ok())
            .unwrap_or(format);

        LogConfig {
            level,
            format,
            ..LogConfig::default()
        }
    }

    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }
}

/// Most verbose level named anywhere in a `RUST_LOG` directive list.
///
/// Targets in this crate are event names, so per-module directives collapse
/// to a single level.
fn level_from_directives(directives: &str) -> Option<LevelFilter> {
    directives
        .split(',')
        .filter_map(|d| d.rsplit('=').next())
        .filter_map(|lvl| lvl.trim().parse::<LevelFilter>().ok())
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_verbosity_level() {
        assert_eq!(verbosity_level(0, false), LevelFilter::WARN);
        assert_eq!(verbosity_level(1, false), LevelFilter::INFO);
        assert_eq!(verbosity_level(2, false), LevelFilter::DEBUG);
        assert_eq!(verbosity_level(9, false), LevelFilter::TRACE);
        assert_eq!(verbosity_level(2, true), LevelFilter::ERROR);
    }

    #[test]
    fn test_cli_choice_kept_without_env() {
        let config = LogConfig::resolve_with(LevelFilter::INFO, LogFormat::Jsonl, env_of(&[]));
        assert_eq!(config.level, LevelFilter::INFO);
        assert_eq!(config.format, LogFormat::Jsonl);
    }

    #[test]
    fn test_lsr_log_beats_rust_log() {
        let env = env_of(&[(ENV_LOG_LEVEL, "error"), (ENV_RUST_LOG, "trace")]);
        let config = LogConfig::resolve_with(LevelFilter::WARN, LogFormat::Human, env);
        assert_eq!(config.level, LevelFilter::ERROR);
    }

    #[test]
    fn test_rust_log_directives() {
        let env = env_of(&[(ENV_RUST_LOG, "hyper=warn,lsr_core=debug")]);
        let config = LogConfig::resolve_with(LevelFilter::WARN, LogFormat::Human, env);
        assert_eq!(config.level, LevelFilter::DEBUG);

        assert_eq!(level_from_directives("lsr_core"), None);
    }

    #[test]
    fn test_format_env_and_garbage() {
        let env = env_of(&[(ENV_LOG_FORMAT, "json"), (ENV_LOG_LEVEL, "loud")]);
        let config = LogConfig::resolve_with(LevelFilter::WARN, LogFormat::Human, env);
        assert_eq!(config.format, LogFormat::Jsonl);
        assert_eq!(config.level, LevelFilter::WARN);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
