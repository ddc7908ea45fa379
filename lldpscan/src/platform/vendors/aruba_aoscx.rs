//! AOS-CX platform definition (6100, 6200, 6300 series).
//!
//! # Prompt Examples
//!
//! ```text
//! core-6100#                  # manager
//! core-6100(config)#          # configuration
//! core-6100(config-if)#       # interface context
//! ```

use crate::platform::{CommandSet, PlatformDefinition};

/// Dialect tag for AOS-CX.
pub const PLATFORM_NAME: &str = "aruba_aoscx";

/// Create the AOS-CX platform definition.
pub fn platform() -> PlatformDefinition {
    let commands = CommandSet {
        neighbors: "show lldp neighbor-info detail".to_string(),
        lldp_config: "show lldp configuration".to_string(),
        ..CommandSet::default()
    };

    PlatformDefinition::new(PLATFORM_NAME, r"(?m)^[\w.\-@()/: ]{1,63}[>#]\s?$")
        .unwrap()
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Unknown command")
        .with_on_open_command("no page")
        .with_commands(commands)
        .with_terminal_size(511, 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aoscx_platform() {
        let platform = platform();
        assert_eq!(platform.name, "aruba_aoscx");
        assert!(platform.continue_pattern.is_none());
        assert_eq!(platform.commands.neighbors, "show lldp neighbor-info detail");
        assert_eq!(platform.commands.arp, "show arp");
    }

    #[test]
    fn test_prompt_match() {
        let prompt = platform().prompt_pattern;
        assert!(prompt.is_match(b"core-6100#"));
        assert!(prompt.is_match(b"core-6100(config-if)# "));
        assert!(!prompt.is_match(b"Chassis ID : aa:bb:cc:dd:ee:ff"));
    }

    #[test]
    fn test_failure_patterns() {
        let platform = platform();
        assert!(platform.detect_failure("% Invalid input detected").is_some());
        assert!(platform.detect_failure("Local Port : 1/1/1").is_none());
    }
}
