// SPDX-License-Identifier: PMPL-1.0-or-later

//! SARIF 2.1.0 output for code scanning integration
//!
//! Converts check findings into OASIS SARIF format, one result per
//! finding, with the catalog as artifact and the message line as region.
//! See: https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html

use crate::check::CheckReport;
use crate::types::{FindingKind, Severity};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;

const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";

/// Top-level SARIF log
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifTool {
    pub driver: SarifToolComponent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifToolComponent {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    pub short_description: SarifMessage,
    pub default_configuration: SarifConfiguration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifConfiguration {
    pub level: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SarifRegion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifArtifactLocation {
    pub uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: u32,
}

/// Stable rule id: `TS001` for the first kind, and so on.
pub fn rule_id(kind: FindingKind) -> String {
    let index = FindingKind::all()
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(0);
    format!("TS{:03}", index + 1)
}

fn rule_description(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::Accelerator => "Keyboard accelerator present in only one of source and translation",
        FindingKind::Punctuation => "Ending punctuation differs between source and translation",
        FindingKind::PlaceMarkers => "Translation uses different %N place markers than the source",
        FindingKind::CountMarker => "Plural form shared by several counts does not show %n",
        FindingKind::Whitespace => "Leading or trailing whitespace differs from the source",
        FindingKind::NumerusForms => "Number of plural forms does not match the language",
        FindingKind::EmptyFinished => "Finished translation has an empty form",
        FindingKind::Duplicate => "Message appears twice with the same key",
        FindingKind::Unfinished => "Translation is unfinished",
        FindingKind::MissingLanguage => "Catalog declares no language",
        FindingKind::UnknownPluralRule => "No plural rule is known for the catalog language",
    }
}

/// Map Severity to SARIF level
fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Note => "note",
    }
}

pub fn to_sarif(reports: &[CheckReport]) -> Result<SarifLog> {
    let mut seen = BTreeSet::new();
    let mut rules = Vec::new();
    let mut results = Vec::new();

    for report in reports {
        let uri = report.path.to_string_lossy().replace('\\', "/");
        for finding in &report.findings {
            let id = rule_id(finding.kind);
            if seen.insert(id.clone()) {
                rules.push(SarifRule {
                    id: id.clone(),
                    name: finding.kind.name().to_string(),
                    short_description: SarifMessage {
                        text: rule_description(finding.kind).to_string(),
                    },
                    default_configuration: SarifConfiguration {
                        level: sarif_level(finding.severity).to_string(),
                    },
                });
            }

            let text = match (&finding.context, &finding.source) {
                (Some(context), Some(source)) => {
                    format!("{} [{}: {:?}]", finding.message, context, source)
                }
                _ => finding.message.clone(),
            };
            results.push(SarifResult {
                rule_id: id,
                level: sarif_level(finding.severity).to_string(),
                message: SarifMessage { text },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation { uri: uri.clone() },
                        region: finding
                            .line
                            .and_then(|line| u32::try_from(line).ok())
                            .map(|start_line| SarifRegion { start_line }),
                    },
                }],
            });
        }
    }
    rules.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(SarifLog {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifToolComponent {
                    name: "tslingo".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    })
}

/// Serialize a SARIF log to JSON string
pub fn to_sarif_json(reports: &[CheckReport]) -> Result<String> {
    let log = to_sarif(reports)?;
    Ok(serde_json::to_string_pretty(&log)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_ids_are_stable() {
        assert_eq!(rule_id(FindingKind::Accelerator), "TS001");
        assert_eq!(rule_id(FindingKind::PlaceMarkers), "TS003");
        assert_eq!(rule_id(FindingKind::UnknownPluralRule), "TS011");
    }
}
