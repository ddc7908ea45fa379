//! # lldpscan
//!
//! LLDP neighbor discovery for Aruba switches over SSH.
//!
//! lldpscan logs into each switch in an inventory, reads its LLDP neighbor
//! table, ARP cache and system identity, and joins them into one report per
//! switch: every neighbor gets the IP addresses the switch has learned for its
//! chassis MAC.
//!
//! ## Layers
//!
//! - [`parse`]: pure text parsers for the CLI transcripts
//! - [`enrich`]: joins neighbors with ARP bindings
//! - [`transport`], [`channel`], [`driver`]: async SSH shell sessions via russh
//! - [`platform`]: prompts, paging and commands per CLI dialect
//! - [`discovery`]: inventory, bounded worker pool and the JSON report
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lldpscan::discovery::{self, ConnectOptions, Inventory};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lldpscan::Error> {
//!     let inventory = Inventory::load("switches.json")?;
//!     let options = ConnectOptions::default();
//!
//!     let report = discovery::discover(&inventory, 4, |switch, platform| {
//!         switch.driver(platform, &options)
//!     })
//!     .await;
//!
//!     report.write_json("output/lldp_discovery.json")?;
//!     Ok(())
//! }
//! ```
//!
//! The parsers need no network at all:
//!
//! ```rust
//! let neighbors = lldpscan::parse_lldp("Local Port : 1/1/1\nChassis ID : aa:bb:cc:dd:ee:ff\n");
//! let arp = lldpscan::parse_arp("10.0.0.5   aa:bb:cc:dd:ee:ff   dynamic   1/1/1\n");
//! let enriched = lldpscan::enrich(&neighbors, &arp);
//! assert!(enriched[0].ip_addresses.contains("10.0.0.5"));
//! ```

pub mod channel;
pub mod discovery;
pub mod driver;
pub mod enrich;
pub mod error;
pub mod model;
pub mod parse;
pub mod platform;
pub mod transport;

// Re-export main types for convenience
pub use discovery::{DiscoveryReport, Inventory, SwitchReport};
pub use driver::{Driver, DriverBuilder, GenericDriver, Response};
pub use enrich::{enrich, enrich_neighbor};
pub use error::Error;
pub use model::{ArpTable, EnrichedNeighbor, Neighbor, SystemInfo};
pub use parse::{extract_field, parse_arp, parse_lldp, parse_system};
pub use platform::{PlatformDefinition, PlatformRegistry};
pub use transport::{AuthMethod, SshConfig};
