//! `show lldp neighbors detail` transcripts.
//!
//! The transcript is a sequence of per-port blocks, each opened by a
//! `Local Port : <token>` marker. Anything before the first marker is command
//! echo or banner text and is ignored.

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use super::field::FieldPattern;
use crate::model::Neighbor;

/// Block marker. Whitespace around the colon may include line breaks, and a
/// marker may appear anywhere in the transcript, including mid-line.
static LOCAL_PORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"Local Port\s*:\s*(\S+)").unwrap());

static MANAGEMENT_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Management Address[ \t]*:[ \t]*([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)").unwrap()
});

static CHASSIS_ID: Lazy<FieldPattern> = Lazy::new(|| FieldPattern::new("Chassis ID"));
static PORT_ID: Lazy<FieldPattern> = Lazy::new(|| FieldPattern::new("Port ID"));
static SYSTEM_NAME: Lazy<FieldPattern> = Lazy::new(|| FieldPattern::new("System Name"));
static SYSTEM_DESCRIPTION: Lazy<FieldPattern> =
    Lazy::new(|| FieldPattern::new("System Description"));
static PORT_DESCRIPTION: Lazy<FieldPattern> = Lazy::new(|| FieldPattern::new("Port Description"));

/// Where the block scanner is in the transcript.
enum ScanState<'a> {
    /// No marker seen yet.
    SeekingBlock,
    /// Inside the block for `local_port`, whose text starts at byte `start`.
    InBlock { local_port: &'a str, start: usize },
}

/// Split a transcript into `(local_port, block_text)` pairs in transcript order.
///
/// Every marker occurrence opens a block; the block runs from the end of the
/// marker's port token to the start of the next marker.
fn split_blocks(text: &str) -> Vec<(&str, &str)> {
    let mut blocks = Vec::new();
    let mut state = ScanState::SeekingBlock;

    for caps in LOCAL_PORT.captures_iter(text) {
        let (Some(marker), Some(port)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let ScanState::InBlock { local_port, start } = state {
            blocks.push((local_port, &text[start..marker.start()]));
        }
        state = ScanState::InBlock {
            local_port: port.as_str(),
            start: port.end(),
        };
    }

    if let ScanState::InBlock { local_port, start } = state {
        blocks.push((local_port, &text[start..]));
    }

    blocks
}

/// Every management address declared in a block, in order, duplicates kept.
fn management_addresses(block: &str) -> Vec<String> {
    MANAGEMENT_ADDRESS
        .captures_iter(block)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parse a neighbor-detail transcript into one [`Neighbor`] per `Local Port` marker.
///
/// A transcript without markers yields an empty list.
pub fn parse_lldp(text: &str) -> Vec<Neighbor> {
    let neighbors: Vec<Neighbor> = split_blocks(text)
        .into_iter()
        .map(|(local_port, block)| Neighbor {
            local_port: local_port.to_string(),
            remote_chassis_id: CHASSIS_ID.find_or_empty(block),
            remote_port_id: PORT_ID.find_or_empty(block),
            remote_system_name: SYSTEM_NAME.find_or_empty(block),
            remote_system_description: SYSTEM_DESCRIPTION.find_or_empty(block),
            remote_port_description: PORT_DESCRIPTION.find_or_empty(block),
            management_addresses: management_addresses(block),
        })
        .collect();

    trace!("parsed {} lldp neighbor block(s)", neighbors.len());
    neighbors
}

/// Check an LLDP configuration transcript for the global enabled flag.
///
/// Accepts both `LLDP Status : Enabled` and `LLDP Enabled [Yes] : Yes` styles.
pub fn lldp_enabled(text: &str) -> bool {
    for line in text.lines() {
        let line = line.trim().to_lowercase();
        if line.contains("lldp status") {
            return line.contains("enabled");
        }
        if line.starts_with("lldp enabled") {
            return line
                .rsplit(':')
                .next()
                .is_some_and(|value| value.trim() == "yes");
        }
    }
    false
}
