//! Platform definition for a switch CLI dialect.

use regex::bytes::Regex;

/// The read-only commands discovery sends to a switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    /// Detailed LLDP neighbor listing.
    pub neighbors: String,

    /// ARP cache listing.
    pub arp: String,

    /// System identity listing.
    pub system: String,

    /// LLDP global configuration, used by the connectivity check.
    pub lldp_config: String,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self {
            neighbors: "show lldp neighbors detail".to_string(),
            arp: "show arp".to_string(),
            system: "show system".to_string(),
            lldp_config: "show lldp configuration".to_string(),
        }
    }
}

/// Everything the driver needs to know about one CLI dialect.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Dialect tag used in device descriptors (e.g. `"aruba_os"`).
    pub name: String,

    /// Pattern matching the CLI prompt at the end of output.
    pub prompt_pattern: Regex,

    /// Login banner that must be dismissed with a keypress before the prompt.
    pub continue_pattern: Option<Regex>,

    /// Output substrings that mark a command as failed.
    pub failed_when_contains: Vec<String>,

    /// Commands run once after login (paging off and similar).
    pub on_open_commands: Vec<String>,

    /// Discovery commands for this dialect.
    pub commands: CommandSet,

    /// Terminal width for the PTY.
    pub terminal_width: u32,

    /// Terminal height for the PTY.
    pub terminal_height: u32,
}

impl PlatformDefinition {
    /// Create a platform with a prompt pattern and default commands.
    pub fn new(name: impl Into<String>, prompt_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            prompt_pattern: Regex::new(prompt_pattern)?,
            continue_pattern: None,
            failed_when_contains: vec![],
            on_open_commands: vec![],
            commands: CommandSet::default(),
            terminal_width: 511,
            terminal_height: 24,
        })
    }

    /// Set the login banner pattern.
    pub fn with_continue_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.continue_pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Replace the discovery commands.
    pub fn with_commands(mut self, commands: CommandSet) -> Self {
        self.commands = commands;
        self
    }

    /// Set terminal dimensions.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Return the first failure pattern found in `output`.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }
}
