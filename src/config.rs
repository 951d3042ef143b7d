// SPDX-License-Identifier: PMPL-1.0-or-later

//! Project configuration (`tslingo.yaml`)
//!
//! Looked up from `--config`, then `$TSLINGO_CONFIG`, then `./tslingo.yaml`.
//! Every field is optional; a missing file means defaults.

use crate::check::CheckConfig;
use crate::report::ReportOutputFormat;
use crate::types::Severity;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_ENV: &str = "TSLINGO_CONFIG";
pub const CONFIG_FILE: &str = "tslingo.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ship unfinished translations when looking messages up
    pub include_unfinished: bool,
    /// Lowest severity that makes `check` exit non-zero
    pub fail_on: Severity,
    pub format: ReportOutputFormat,
    pub checks: CheckConfig,
    pub scan: ScanSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Path components to skip while scanning (`build`, `3rdparty`, ...)
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_unfinished: true,
            fail_on: Severity::Error,
            format: ReportOutputFormat::Text,
            checks: CheckConfig::default(),
            scan: ScanSettings::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Load the configuration for this process. Returns the file that was
    /// used, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let from_env = std::env::var(CONFIG_ENV).ok();
        Self::load_from(explicit, from_env.as_deref(), Path::new("."))
    }

    fn load_from(
        explicit: Option<&Path>,
        from_env: Option<&str>,
        cwd: &Path,
    ) -> Result<(Self, Option<PathBuf>)> {
        // An explicitly named file has to exist; the default one does not.
        let required = explicit
            .map(Path::to_path_buf)
            .or_else(|| from_env.filter(|v| !v.is_empty()).map(PathBuf::from));
        if let Some(path) = required {
            let config = Self::from_file(&path)?;
            debug!(path = %path.display(), "configuration loaded");
            return Ok((config, Some(path)));
        }

        let default = cwd.join(CONFIG_FILE);
        if default.is_file() {
            let config = Self::from_file(&default)?;
            debug!(path = %default.display(), "configuration loaded");
            return Ok((config, Some(default)));
        }
        Ok((Self::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml_str(
            "fail_on: warning\nchecks:\n  punctuation: false\nscan:\n  exclude: [build]\n",
        )
        .unwrap();
        assert_eq!(config.fail_on, Severity::Warning);
        assert!(!config.checks.punctuation);
        assert!(config.checks.accelerators);
        assert!(config.include_unfinished);
        assert_eq!(config.format, ReportOutputFormat::Text);
        assert_eq!(config.scan.exclude, vec!["build".to_string()]);
    }

    #[test]
    fn empty_file_is_default() {
        let config = Config::from_yaml_str("").unwrap();
        assert_eq!(config.fail_on, Severity::Error);
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!(Config::from_yaml_str("fail_on: fatal\n").is_err());
    }

    #[test]
    fn lookup_order() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path();

        let (config, used) = Config::load_from(None, None, cwd).unwrap();
        assert!(used.is_none());
        assert!(config.include_unfinished);

        fs::write(cwd.join(CONFIG_FILE), "include_unfinished: false\n").unwrap();
        let (config, used) = Config::load_from(None, None, cwd).unwrap();
        assert_eq!(used, Some(cwd.join(CONFIG_FILE)));
        assert!(!config.include_unfinished);

        let other = cwd.join("other.yaml");
        fs::write(&other, "format: json\n").unwrap();
        let env_value = other.to_string_lossy().into_owned();
        let (config, used) = Config::load_from(None, Some(&env_value), cwd).unwrap();
        assert_eq!(used, Some(other.clone()));
        assert_eq!(config.format, ReportOutputFormat::Json);

        let missing = cwd.join("missing.yaml");
        assert!(Config::load_from(Some(missing.as_path()), Some(&env_value), cwd).is_err());
    }
}
