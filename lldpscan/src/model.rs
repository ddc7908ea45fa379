//! Structured records produced by the parsers and the enrichment step.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// One LLDP neighbor as announced on a local port.
///
/// Fields the transcript did not carry are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    /// Local port the neighbor was seen on (e.g. `1/1/1` or `24`).
    pub local_port: String,

    /// Neighbor chassis identifier, commonly a MAC address.
    pub remote_chassis_id: String,

    /// Neighbor port identifier.
    pub remote_port_id: String,

    /// Neighbor system name.
    pub remote_system_name: String,

    /// Neighbor system description.
    pub remote_system_description: String,

    /// Neighbor port description.
    pub remote_port_description: String,

    /// Declared management addresses, in transcript order, duplicates kept.
    pub management_addresses: Vec<String>,
}

/// IPv4 to MAC bindings from a switch's ARP cache.
///
/// Keys are unique; inserting an IP again replaces its MAC but keeps the
/// position of the first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArpTable {
    entries: IndexMap<String, String>,
}

impl ArpTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a binding. The MAC is stored lowercased.
    pub fn insert(&mut self, ip: impl Into<String>, mac: &str) -> Option<String> {
        self.entries.insert(ip.into(), mac.to_lowercase())
    }

    /// Look up the MAC for an IP.
    pub fn get(&self, ip: &str) -> Option<&str> {
        self.entries.get(ip).map(String::as_str)
    }

    /// Iterate `(ip, mac)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(ip, mac)| (ip.as_str(), mac.as_str()))
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I: Into<String>, M: AsRef<str>> FromIterator<(I, M)> for ArpTable {
    fn from_iter<T: IntoIterator<Item = (I, M)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (ip, mac) in iter {
            table.insert(ip, mac.as_ref());
        }
        table
    }
}

/// Device identity read from the system information listing.
///
/// A field is `None` when its label was not present; no defaults are filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl SystemInfo {
    /// Check if no field was recognized.
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.serial.is_none()
            && self.firmware.is_none()
            && self.hostname.is_none()
    }
}

/// A neighbor joined with the ARP table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedNeighbor {
    /// The neighbor as parsed.
    #[serde(flatten)]
    pub neighbor: Neighbor,

    /// ARP-matched IPs followed by management addresses, without duplicates.
    pub ip_addresses: IndexSet<String>,

    /// Lowercased chassis identifier.
    pub mac_address: String,

    /// Neighbor system name, or `"Unknown"` when it announced none.
    pub hostname: String,
}
