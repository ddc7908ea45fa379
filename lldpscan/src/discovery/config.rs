//! Switch inventory loaded from a JSON file.
//!
//! ```json
//! {
//!   "switches": [
//!     { "host": "10.0.0.2", "username": "admin", "password": "secret" },
//!     { "host": "10.0.0.3", "username": "admin", "password": "secret",
//!       "device_type": "aruba_aoscx", "port": 2222 }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::error;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::driver::{DriverBuilder, GenericDriver};
use crate::error::{ConfigError, Result};
use crate::platform::{DEFAULT_PLATFORM, PlatformDefinition};
use crate::transport::HostKeyVerification;

#[derive(Deserialize)]
struct InventoryFile {
    #[serde(default)]
    switches: Vec<SwitchEntry>,
}

/// A descriptor as written in the file; anything may be missing.
#[derive(Deserialize)]
struct SwitchEntry {
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    device_type: Option<String>,
    port: Option<u16>,
}

/// Connection settings shared by every switch in a run.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Connect and per-command timeout.
    pub timeout: Duration,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// known_hosts file; `None` uses the user's default.
    pub known_hosts_path: Option<PathBuf>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }
}

/// A complete switch descriptor.
#[derive(Debug)]
pub struct SwitchConfig {
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Dialect tag, looked up in the platform registry.
    pub device_type: String,
    pub port: u16,
}

impl SwitchConfig {
    /// Build an SSH driver for this switch.
    pub fn driver(
        &self,
        platform: PlatformDefinition,
        options: &ConnectOptions,
    ) -> Result<GenericDriver> {
        let mut builder = DriverBuilder::new(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .custom_platform(platform)
            .timeout(options.timeout)
            .host_key_verification(options.host_key_verification);
        if let Some(path) = &options.known_hosts_path {
            builder = builder.known_hosts_path(path);
        }
        builder.build()
    }
}

/// The switches to visit, after dropping incomplete descriptors.
#[derive(Debug, Default)]
pub struct Inventory {
    /// Descriptors with host, username and password present.
    pub switches: Vec<SwitchConfig>,

    /// Why each incomplete descriptor was skipped.
    pub rejected: Vec<ConfigError>,
}

impl Inventory {
    /// Read and validate an inventory file.
    ///
    /// Incomplete descriptors and repeats of an earlier host are logged and
    /// kept in `rejected`; a file that lists no switches at all is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Validate inventory JSON. `origin` is only used in error messages.
    pub fn from_json(text: &str, origin: impl AsRef<Path>) -> Result<Self> {
        let file: InventoryFile =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse {
                path: origin.as_ref().to_path_buf(),
                source,
            })?;

        if file.switches.is_empty() {
            return Err(ConfigError::NoSwitches.into());
        }

        let mut inventory = Inventory::default();
        let mut hosts = HashSet::new();
        for (index, entry) in file.switches.into_iter().enumerate() {
            let validated = validate(index, entry).and_then(|switch| {
                if hosts.insert(switch.host.clone()) {
                    Ok(switch)
                } else {
                    Err(ConfigError::DuplicateHost {
                        index,
                        host: switch.host,
                    })
                }
            });
            match validated {
                Ok(switch) => inventory.switches.push(switch),
                Err(e) => {
                    error!("skipping switch: {}", e);
                    inventory.rejected.push(e);
                }
            }
        }
        Ok(inventory)
    }

    /// Number of descriptors in the file, complete or not.
    pub fn total(&self) -> usize {
        self.switches.len() + self.rejected.len()
    }
}

fn validate(index: usize, entry: SwitchEntry) -> std::result::Result<SwitchConfig, ConfigError> {
    // Empty strings count as missing.
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let host = present(entry.host);
    let username = present(entry.username);
    let password = present(entry.password);

    match (host, username, password) {
        (Some(host), Some(username), Some(password)) => Ok(SwitchConfig {
            host,
            username,
            password: SecretString::from(password),
            device_type: present(entry.device_type)
                .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            port: entry.port.unwrap_or(22),
        }),
        (host, username, password) => {
            let missing = [
                ("host", host.is_none()),
                ("username", username.is_none()),
                ("password", password.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            Err(ConfigError::Incomplete { index, missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_complete_entries() {
        let json = r#"{"switches": [
            {"host": "10.0.0.2", "username": "admin", "password": "pw"},
            {"host": "10.0.0.3", "username": "ops", "password": "pw2",
             "device_type": "aruba_aoscx", "port": 2222}
        ]}"#;
        let inventory = Inventory::from_json(json, "inline").unwrap();
        assert_eq!(inventory.total(), 2);
        assert!(inventory.rejected.is_empty());

        let first = &inventory.switches[0];
        assert_eq!(first.host, "10.0.0.2");
        assert_eq!(first.device_type, "aruba_os");
        assert_eq!(first.port, 22);
        assert_eq!(first.password.expose_secret(), "pw");

        let second = &inventory.switches[1];
        assert_eq!(second.device_type, "aruba_aoscx");
        assert_eq!(second.port, 2222);
    }

    #[test]
    fn test_incomplete_entries_skipped_but_counted() {
        let json = r#"{"switches": [
            {"host": "10.0.0.2", "username": "admin"},
            {"username": "admin", "password": ""},
            {"host": "10.0.0.4", "username": "admin", "password": "pw"}
        ]}"#;
        let inventory = Inventory::from_json(json, "inline").unwrap();
        assert_eq!(inventory.switches.len(), 1);
        assert_eq!(inventory.total(), 3);

        match &inventory.rejected[0] {
            ConfigError::Incomplete { index, missing } => {
                assert_eq!(*index, 0);
                assert_eq!(missing, &vec!["password"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
        match &inventory.rejected[1] {
            ConfigError::Incomplete { index, missing } => {
                assert_eq!(*index, 1);
                assert_eq!(missing, &vec!["host", "password"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_host_rejected() {
        let json = r#"{"switches": [
            {"host": "10.0.0.2", "username": "admin", "password": "pw"},
            {"host": "10.0.0.3", "username": "admin", "password": "pw"},
            {"host": "10.0.0.2", "username": "ops", "password": "pw2"}
        ]}"#;
        let inventory = Inventory::from_json(json, "inline").unwrap();

        let hosts: Vec<&str> = inventory.switches.iter().map(|s| s.host.as_str()).collect();
        assert_eq!(hosts, vec!["10.0.0.2", "10.0.0.3"]);
        assert_eq!(inventory.switches[0].username, "admin");
        assert_eq!(inventory.total(), 3);

        match &inventory.rejected[..] {
            [ConfigError::DuplicateHost { index, host }] => {
                assert_eq!(*index, 2);
                assert_eq!(host, "10.0.0.2");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_no_switches() {
        assert!(matches!(
            Inventory::from_json(r#"{"switches": []}"#, "inline"),
            Err(Error::Config(ConfigError::NoSwitches))
        ));
        assert!(matches!(
            Inventory::from_json("{}", "inline"),
            Err(Error::Config(ConfigError::NoSwitches))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Inventory::from_json("{switches: ", "bad.json"),
            Err(Error::Config(ConfigError::Parse { .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Inventory::load("/nonexistent/switches.json"),
            Err(Error::Config(ConfigError::Read { .. }))
        ));
    }

    #[test]
    fn test_incomplete_message_names_fields() {
        let e = ConfigError::Incomplete {
            index: 2,
            missing: vec!["host", "username"],
        };
        assert_eq!(e.to_string(), "Switch entry #2 is missing: host, username");
    }

    #[test]
    fn test_driver_from_config() {
        let json = r#"{"switches": [{"host": "10.0.0.2", "username": "admin", "password": "pw"}]}"#;
        let inventory = Inventory::from_json(json, "inline").unwrap();
        let platform = crate::platform::PlatformRegistry::lookup("aruba_os").unwrap();
        let driver = inventory.switches[0]
            .driver(platform, &ConnectOptions::default())
            .unwrap();
        assert_eq!(driver.platform().name, "aruba_os");
    }
}
