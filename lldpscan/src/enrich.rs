//! Join LLDP neighbors with the ARP table.
//!
//! A neighbor's chassis ID is usually its MAC, so ARP entries whose MAC
//! matches the chassis ID give the neighbor's IP addresses. These are merged
//! with the management addresses the neighbor announced itself.

use indexmap::IndexSet;
use log::debug;

use crate::model::{ArpTable, EnrichedNeighbor, Neighbor};

/// Hostname used when a neighbor announced no system name.
pub const UNKNOWN_HOSTNAME: &str = "Unknown";

/// Loose MAC comparison between a lowercased chassis ID and an ARP MAC.
///
/// Matches when the chassis ID is a non-empty substring of the MAC, or the
/// MAC is a substring of the chassis ID. This tolerates truncated or
/// decorated chassis IDs but can also match unrelated entries when the chassis
/// ID is short or numeric.
pub fn chassis_matches(chassis_id: &str, mac: &str) -> bool {
    (!chassis_id.is_empty() && mac.contains(chassis_id)) || chassis_id.contains(mac)
}

/// Enrich a single neighbor.
pub fn enrich_neighbor(neighbor: &Neighbor, arp: &ArpTable) -> EnrichedNeighbor {
    let chassis_id = neighbor.remote_chassis_id.to_lowercase();

    let mut ip_addresses: IndexSet<String> = arp
        .iter()
        .filter(|(_, mac)| chassis_matches(&chassis_id, mac))
        .map(|(ip, _)| ip.to_string())
        .collect();
    let arp_matches = ip_addresses.len();
    ip_addresses.extend(neighbor.management_addresses.iter().cloned());

    let hostname = if neighbor.remote_system_name.is_empty() {
        UNKNOWN_HOSTNAME.to_string()
    } else {
        neighbor.remote_system_name.clone()
    };

    debug!(
        "neighbor on {}: {} arp match(es), {} address(es) total",
        neighbor.local_port,
        arp_matches,
        ip_addresses.len()
    );

    EnrichedNeighbor {
        neighbor: neighbor.clone(),
        ip_addresses,
        mac_address: chassis_id,
        hostname,
    }
}

/// Enrich every neighbor, preserving order and count.
pub fn enrich(neighbors: &[Neighbor], arp: &ArpTable) -> Vec<EnrichedNeighbor> {
    neighbors
        .iter()
        .map(|neighbor| enrich_neighbor(neighbor, arp))
        .collect()
}
