//! ArubaOS-Switch platform definition (2530, 2930F and older ProCurve).
//!
//! After login these switches print a support banner ending in
//! `Press any key to continue`; the prompt only appears once a key is sent.
//!
//! # Prompt Examples
//!
//! ```text
//! HP-2530-48G>                # operator
//! HP-2530-48G#                # manager
//! HP-2530-48G(config)#        # configuration
//! ```

use crate::platform::PlatformDefinition;

/// Dialect tag for ArubaOS-Switch.
pub const PLATFORM_NAME: &str = "aruba_os";

/// Create the ArubaOS-Switch platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(PLATFORM_NAME, r"(?m)^[\w.\-@()/: ]{1,63}[>#]\s?$")
        .unwrap()
        .with_continue_pattern(r"(?i)press any key to continue")
        .unwrap()
        .with_failure_pattern("Invalid input:")
        .with_failure_pattern("Ambiguous input:")
        .with_failure_pattern("Incomplete input:")
        .with_on_open_command("no page")
        .with_terminal_size(511, 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aruba_os_platform() {
        let platform = platform();
        assert_eq!(platform.name, "aruba_os");
        assert_eq!(platform.on_open_commands, vec!["no page"]);
        assert!(platform.continue_pattern.is_some());
    }

    #[test]
    fn test_prompt_match() {
        let prompt = platform().prompt_pattern;
        assert!(prompt.is_match(b"HP-2530-48G#"));
        assert!(prompt.is_match(b"HP-2530-48G# "));
        assert!(prompt.is_match(b"HP-2530-48G>"));
        assert!(prompt.is_match(b"output\r\nHP-2530-48G(config)#"));
        assert!(!prompt.is_match(b"Local Port : 24"));
    }

    #[test]
    fn test_continue_banner() {
        let platform = platform();
        let banner = platform.continue_pattern.unwrap();
        assert!(banner.is_match(b"HPE Networking\r\n\r\nPress any key to continue"));
        assert!(!banner.is_match(b"HP-2530-48G#"));
    }

    #[test]
    fn test_failure_patterns() {
        let platform = platform();
        assert_eq!(
            platform.detect_failure("Invalid input: neighbours"),
            Some("Invalid input:")
        );
    }
}
