//! Text grammar for switch command transcripts.
//!
//! Every parser here is a pure function over a transcript: no I/O, no
//! retained state, and no error path. Unrecognized text is skipped and missing
//! fields come back empty or `None`.

mod arp;
mod field;
mod lldp;
mod system;

pub use arp::parse_arp;
pub use field::{FieldPattern, extract_field};
pub use lldp::{lldp_enabled, parse_lldp};
pub use system::parse_system;
