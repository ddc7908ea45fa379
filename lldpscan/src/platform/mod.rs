//! Platform definitions for the supported switch dialects.
//!
//! A platform carries the prompt pattern, login quirks, paging commands,
//! failure strings and the discovery command set for one CLI dialect.

mod definition;
mod registry;
pub mod vendors;

pub use definition::{CommandSet, PlatformDefinition};
pub use registry::{DEFAULT_PLATFORM, PlatformRegistry};
