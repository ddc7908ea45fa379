//! `show system` transcripts.

use once_cell::sync::Lazy;

use super::field::FieldPattern;
use crate::model::SystemInfo;

static PRODUCT_MODEL: Lazy<FieldPattern> = Lazy::new(|| FieldPattern::new("Product Model"));
static SERIAL_NUMBER: Lazy<FieldPattern> = Lazy::new(|| FieldPattern::new("Serial Number"));
static FIRMWARE_VERSION: Lazy<FieldPattern> = Lazy::new(|| FieldPattern::new("Firmware Version"));
static SYSTEM_NAME: Lazy<FieldPattern> = Lazy::new(|| FieldPattern::new("System Name"));

/// Extract model, serial, firmware and hostname from a system-info transcript.
///
/// Fields whose label is missing stay `None`.
pub fn parse_system(text: &str) -> SystemInfo {
    SystemInfo {
        model: PRODUCT_MODEL.find(text),
        serial: SERIAL_NUMBER.find(text),
        firmware: FIRMWARE_VERSION.find(text),
        hostname: SYSTEM_NAME.find(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields() {
        let text = "\
Hostname          : ignored
System Name       : core-6100
Product Model     : JL679A 6100 12G CL4 2SFP+ Swch
Serial Number     : CN12ABC345
Firmware Version  : PL.10.13.1000
";
        let info = parse_system(text);
        assert_eq!(info.hostname.as_deref(), Some("core-6100"));
        assert_eq!(info.model.as_deref(), Some("JL679A 6100 12G CL4 2SFP+ Swch"));
        assert_eq!(info.serial.as_deref(), Some("CN12ABC345"));
        assert_eq!(info.firmware.as_deref(), Some("PL.10.13.1000"));
        assert!(!info.is_empty());
    }

    #[test]
    fn test_partial_fields_stay_absent() {
        let info = parse_system("  System Name : edge-2530\n  Uptime : 3 days\n");
        assert_eq!(info.hostname.as_deref(), Some("edge-2530"));
        assert_eq!(info.model, None);
        assert_eq!(info.serial, None);
        assert_eq!(info.firmware, None);
    }

    #[test]
    fn test_empty_transcript() {
        assert!(parse_system("").is_empty());
    }

    #[test]
    fn test_absent_fields_not_serialized() {
        let info = parse_system("Serial Number : SG00001\n");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json, serde_json::json!({ "serial": "SG00001" }));
    }
}
