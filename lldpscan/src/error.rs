//! Error types for lldpscan.
//!
//! Parsing and enrichment are total over text input and never fail; every
//! variant here originates in the I/O and orchestration layers.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for lldpscan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// PTY channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform lookup errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Device configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Result document errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication rejected by the switch
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Private key could not be loaded
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host is not in known_hosts and verification is strict
    #[error("Host key for {host}:{port} is not known")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection attempt timed out
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),
}

/// Channel layer errors (PTY reads and writes).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Prompt not seen before the deadline
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Remote side closed the channel
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(#[from] russh::Error),
}

/// Driver layer errors (command execution).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// The switch reported a failure for a command
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Platform registry errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// No platform registered under this dialect tag
    #[error("Unknown platform '{name}'")]
    UnknownPlatform { name: String },

    /// A platform with this name already exists
    #[error("Platform '{name}' is already registered")]
    AlreadyRegistered { name: String },

    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },
}

/// Device configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File is not valid JSON for the expected shape
    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A switch descriptor lacks a required field
    #[error("Switch entry #{index} is missing: {}", .missing.join(", "))]
    Incomplete {
        index: usize,
        missing: Vec<&'static str>,
    },

    /// A switch descriptor repeats a host listed earlier
    #[error("Switch entry #{index} repeats host {host}")]
    DuplicateHost { index: usize, host: String },

    /// The file lists no switches at all
    #[error("No switches configured")]
    NoSwitches,
}

/// Result document errors.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Output file could not be written
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Report could not be serialized
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias using lldpscan's Error.
pub type Result<T> = std::result::Result<T, Error>;
