//! `show arp` transcripts.

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ArpTable;

/// An IPv4 dotted quad, whitespace, a MAC-like token, whitespace.
static ARP_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)\s+([0-9a-fA-F:.\-]+)\s+").unwrap()
});

/// Parse an ARP transcript into IP to lowercase-MAC bindings.
///
/// Headers, separators and blank lines are skipped. When an IP appears on
/// several lines the last one wins.
pub fn parse_arp(text: &str) -> ArpTable {
    let mut table = ArpTable::new();

    // Split on '\n' only so a trailing '\r' still counts as the separator after the MAC.
    for line in text.split('\n') {
        if let Some(caps) = ARP_ENTRY.captures(line) {
            table.insert(&caps[1], &caps[2]);
        }
    }

    trace!("parsed {} arp entr(ies)", table.len());
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_entry() {
        let table = parse_arp("10.0.0.5   aa:bb:cc:dd:ee:ff   dynamic   1/1/1\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("10.0.0.5"), Some("aa:bb:cc:dd:ee:ff"));
    }

    #[test]
    fn test_aruba_os_table() {
        let text = "\
 IP ARP table

  IP Address       MAC Address       Type    Port
  ---------------  ----------------- ------- ----
  10.1.1.1         00A0C9-14C829     dynamic 24
  10.1.1.20        3c4a92-1b2c3d     dynamic 3
";
        let table = parse_arp(text);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("10.1.1.1"), Some("00a0c9-14c829"));
        assert_eq!(table.get("10.1.1.20"), Some("3c4a92-1b2c3d"));
    }

    #[test]
    fn test_dotted_mac_and_crlf() {
        let table = parse_arp("192.168.0.9  0011.2233.4455\r\n");
        assert_eq!(table.get("192.168.0.9"), Some("0011.2233.4455"));
    }

    #[test]
    fn test_later_line_wins() {
        let text = "10.0.0.5 aa:aa:aa:aa:aa:aa dynamic\n10.0.0.6 cc:cc:cc:cc:cc:cc dynamic\n10.0.0.5 BB:BB:BB:BB:BB:BB dynamic\n";
        let table = parse_arp(text);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("10.0.0.5"), Some("bb:bb:bb:bb:bb:bb"));
        // Overwriting keeps the first position.
        let ips: Vec<_> = table.iter().map(|(ip, _)| ip).collect();
        assert_eq!(ips, vec!["10.0.0.5", "10.0.0.6"]);
    }

    #[test]
    fn test_requires_whitespace_after_mac() {
        assert!(parse_arp("10.0.0.5 aa:bb:cc:dd:ee:ff").is_empty());
    }

    #[test]
    fn test_non_matching_lines_skipped() {
        let text = "\nIP Address  MAC Address  Type\n-----------\nTotal entries: 0\n";
        assert!(parse_arp(text).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let text = "10.0.0.1 aa:bb:cc:00:00:01 dynamic\n10.0.0.2 aa:bb:cc:00:00:02 dynamic\n";
        assert_eq!(parse_arp(text), parse_arp(text));
    }
}
