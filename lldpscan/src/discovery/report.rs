//! Result documents written at the end of a run.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{ReportError, Result};
use crate::model::{EnrichedNeighbor, SystemInfo};

/// Everything discovered on one switch.
#[derive(Debug, Clone, Serialize)]
pub struct SwitchReport {
    pub switch_ip: String,
    pub timestamp: DateTime<Local>,
    pub neighbors_count: usize,
    pub system: SystemInfo,
    /// In the order the switch listed them.
    pub neighbors: Vec<EnrichedNeighbor>,
}

impl SwitchReport {
    pub fn new(switch_ip: impl Into<String>, system: SystemInfo, neighbors: Vec<EnrichedNeighbor>) -> Self {
        Self {
            switch_ip: switch_ip.into(),
            timestamp: Local::now(),
            neighbors_count: neighbors.len(),
            system,
            neighbors,
        }
    }
}

/// Run-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Descriptors in the inventory, including skipped ones.
    pub total_switches: usize,
    pub successful_connections: usize,
    pub total_neighbors: usize,
}

/// The document written for a discovery run.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    pub discovery_timestamp: DateTime<Local>,
    /// Keyed by switch address, in inventory order.
    pub switches: IndexMap<String, SwitchReport>,
    /// Error text for each switch that could not be queried.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub failures: IndexMap<String, String>,
    pub summary: Summary,
}

impl DiscoveryReport {
    /// Start an empty report for an inventory of `total_switches` descriptors.
    pub fn new(total_switches: usize) -> Self {
        Self {
            discovery_timestamp: Local::now(),
            switches: IndexMap::new(),
            failures: IndexMap::new(),
            summary: Summary {
                total_switches,
                ..Summary::default()
            },
        }
    }

    /// Add a successfully queried switch.
    pub fn record_success(&mut self, report: SwitchReport) {
        self.summary.successful_connections += 1;
        self.summary.total_neighbors += report.neighbors_count;
        self.switches.insert(report.switch_ip.clone(), report);
    }

    /// Note a switch that could not be queried.
    pub fn record_failure(&mut self, host: impl Into<String>, error: impl ToString) {
        self.failures.insert(host.into(), error.to_string());
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(ReportError::Serialize)?)
    }

    /// Write the report as pretty-printed JSON, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let write_error = |source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let mut writer = BufWriter::new(File::create(path).map_err(write_error)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(ReportError::Serialize)?;
        writer.write_all(b"\n").map_err(write_error)?;
        writer.flush().map_err(write_error)?;
        Ok(())
    }
}

/// Result of a connectivity check against one switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectivityReport {
    pub host: String,
    pub lldp_enabled: bool,
    pub neighbors: usize,
    pub arp_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Neighbor;

    fn switch(ip: &str, neighbors: usize) -> SwitchReport {
        let enriched = (0..neighbors)
            .map(|i| EnrichedNeighbor {
                neighbor: Neighbor {
                    local_port: format!("1/1/{}", i + 1),
                    ..Default::default()
                },
                ip_addresses: Default::default(),
                mac_address: String::new(),
                hostname: "Unknown".to_string(),
            })
            .collect();
        SwitchReport::new(ip, SystemInfo::default(), enriched)
    }

    #[test]
    fn test_summary_accumulates() {
        let mut report = DiscoveryReport::new(3);
        report.record_success(switch("10.0.0.2", 2));
        report.record_success(switch("10.0.0.3", 5));
        report.record_failure("10.0.0.4", "Connection timed out after 60s");

        assert_eq!(
            report.summary,
            Summary {
                total_switches: 3,
                successful_connections: 2,
                total_neighbors: 7,
            }
        );
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let mut report = DiscoveryReport::new(1);
        report.record_success(switch("10.0.0.2", 1));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert!(json["discovery_timestamp"].is_string());
        assert!(json.get("failures").is_none());
        assert_eq!(json["summary"]["total_switches"], 1);
        assert_eq!(json["summary"]["successful_connections"], 1);
        assert_eq!(json["summary"]["total_neighbors"], 1);

        let sw = &json["switches"]["10.0.0.2"];
        assert_eq!(sw["switch_ip"], "10.0.0.2");
        assert_eq!(sw["neighbors_count"], 1);
        assert_eq!(sw["neighbors"][0]["local_port"], "1/1/1");
        assert_eq!(sw["system"], serde_json::json!({}));
    }

    #[test]
    fn test_write_json_creates_directories() {
        let dir = std::env::temp_dir().join(format!("lldpscan-report-{}", std::process::id()));
        let path = dir.join("nested").join("lldp_discovery.json");

        DiscoveryReport::new(0).write_json(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"total_switches\": 0"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
