//! Built-in switch dialects.

pub mod aruba_aoscx;
pub mod aruba_os;
