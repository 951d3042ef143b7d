// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed/exported reports

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportOutputFormat {
    /// Colored terminal summary
    Text,
    Json,
    Yaml,
}

impl ReportOutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(ReportOutputFormat::Text),
            "json" => Some(ReportOutputFormat::Json),
            "yaml" | "yml" => Some(ReportOutputFormat::Yaml),
            _ => None,
        }
    }

    /// Format implied by an output file name, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    pub fn serialize<T: Serialize>(&self, report: &T) -> Result<String> {
        match self {
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
            ReportOutputFormat::Text => {
                bail!("text reports are printed by the formatter, not serialized")
            }
        }
    }
}

/// Write a structured report to disk, creating parent directories.
pub fn save<T: Serialize>(report: &T, path: &Path, format: ReportOutputFormat) -> Result<()> {
    let body = format.serialize(report)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn parse_aliases() {
        assert_eq!(ReportOutputFormat::parse("YML"), Some(ReportOutputFormat::Yaml));
        assert_eq!(ReportOutputFormat::parse("txt"), Some(ReportOutputFormat::Text));
        assert_eq!(ReportOutputFormat::parse("ncl"), None);
        assert_eq!(
            ReportOutputFormat::from_path(Path::new("out/report.json")),
            Some(ReportOutputFormat::Json)
        );
    }

    #[test]
    fn structured_formats_serialize() {
        let mut value = BTreeMap::new();
        value.insert("messages", 3);
        let json = ReportOutputFormat::Json.serialize(&value).unwrap();
        assert!(json.contains("\"messages\": 3"));
        let yaml = ReportOutputFormat::Yaml.serialize(&value).unwrap();
        assert!(yaml.contains("messages: 3"));
        assert!(ReportOutputFormat::Text.serialize(&value).is_err());
    }
}
