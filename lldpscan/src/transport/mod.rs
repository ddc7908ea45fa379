//! SSH transport layer wrapping russh.
//!
//! Connection setup, authentication, host key checks and shell channel
//! creation. Reads and writes on the shell happen in [`crate::channel`].

pub mod config;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use ssh::SshTransport;
