//! Layered rulesetctl configuration
//!
//! Precedence, lowest first: built-in defaults, the JSON file named by
//! `--config`, `RULESETCTL_*` environment variables, command-line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::cli::GlobalArgs;
use crate::error::{CliError, CliResult};
use crate::logging::{levels, LoggingConfig};

pub const ENV_PREFIX: &str = "RULESETCTL_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Base directory for the snapshot and relative ruleset paths
    pub data_dir: PathBuf,
    pub snapshot_file: String,
    pub save_debounce_ms: u64,
    /// Seconds between background refresh sweeps; 0 disables them
    pub auto_refresh_secs: u64,
    pub download_timeout_secs: u64,
    pub labels_file: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            snapshot_file: ruleset_store::DEFAULT_SNAPSHOT_PATH.to_string(),
            save_debounce_ms: 500,
            auto_refresh_secs: 86_400,
            download_timeout_secs: 30,
            labels_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl CliConfig {
    /// Resolve the configuration from every source using the process environment
    pub fn load(args: &GlobalArgs) -> CliResult<Self> {
        Self::load_with_env(args, |key| std::env::var(key).ok())
    }

    /// Resolve the configuration with an explicit environment lookup
    pub fn load_with_env<F>(args: &GlobalArgs, env: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(env)?;
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CliError::config("config", format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| CliError::config("config", format!("{}: {}", path.display(), e)))
    }

    fn apply_env<F>(&mut self, env: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(&format!("{}{}", ENV_PREFIX, name));

        if let Some(v) = var("DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("SNAPSHOT_FILE") {
            self.snapshot_file = v;
        }
        if let Some(v) = var("SAVE_DEBOUNCE_MS") {
            self.save_debounce_ms = parse_env("SAVE_DEBOUNCE_MS", &v)?;
        }
        if let Some(v) = var("AUTO_REFRESH_SECS") {
            self.auto_refresh_secs = parse_env("AUTO_REFRESH_SECS", &v)?;
        }
        if let Some(v) = var("DOWNLOAD_TIMEOUT_SECS") {
            self.download_timeout_secs = parse_env("DOWNLOAD_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = var("LABELS_FILE") {
            self.labels_file = Some(PathBuf::from(v));
        }
        if let Some(v) = var("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("LOG_JSON") {
            self.logging.json_format = parse_env("LOG_JSON", &v)?;
        }
        if let Some(v) = var("LOG_FILE") {
            self.logging.log_file = Some(v);
        }
        Ok(())
    }

    fn apply_args(&mut self, args: &GlobalArgs) {
        if let Some(dir) = &args.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(file) = &args.snapshot_file {
            self.snapshot_file = file.clone();
        }
        if let Some(ms) = args.save_debounce_ms {
            self.save_debounce_ms = ms;
        }
        if let Some(secs) = args.download_timeout {
            self.download_timeout_secs = secs;
        }
        if let Some(labels) = &args.labels {
            self.labels_file = Some(labels.clone());
        }
        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
        }
        if args.log_json {
            self.logging.json_format = true;
        }
        if let Some(file) = &args.log_file {
            self.logging.log_file = Some(file.clone());
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.snapshot_file.trim().is_empty() {
            return Err(CliError::config("snapshot_file", "must not be empty"));
        }
        if self.download_timeout_secs == 0 {
            return Err(CliError::config(
                "download_timeout_secs",
                "must be greater than zero",
            ));
        }
        if !levels::is_valid_level(&self.logging.level) {
            return Err(CliError::config(
                "logging.level",
                format!(
                    "'{}' is not one of {}",
                    self.logging.level,
                    levels::valid_levels().join(", ")
                ),
            ));
        }
        Ok(())
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn auto_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.auto_refresh_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

fn parse_env<T>(name: &str, value: &str) -> CliResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CliError::config(format!("{}{}", ENV_PREFIX, name), format!("{}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_names_the_variable() {
        let err = parse_env::<u64>("SAVE_DEBOUNCE_MS", "soon").unwrap_err();
        assert!(err.to_string().contains("RULESETCTL_SAVE_DEBOUNCE_MS"));
        assert_eq!(parse_env::<bool>("LOG_JSON", " true ").unwrap(), true);
    }

    #[test]
    fn test_durations() {
        let config = CliConfig::default();
        assert_eq!(config.save_debounce(), Duration::from_millis(500));
        assert_eq!(config.download_timeout(), Duration::from_secs(30));
        assert_eq!(config.auto_refresh_interval(), Duration::from_secs(86_400));
    }
}
