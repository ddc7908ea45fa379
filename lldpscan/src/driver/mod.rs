//! High-level driver for switch interaction.
//!
//! [`Driver`] is the seam between discovery and the wire: discovery only
//! needs "send this command, give me its text". [`GenericDriver`] provides
//! that over SSH.

mod builder;
mod generic;
mod response;

pub use builder::DriverBuilder;
pub use generic::GenericDriver;
pub use response::Response;

use std::future::Future;

use crate::error::Result;

/// Trait for switch drivers.
pub trait Driver: Send + Sync {
    /// Address of the switch this driver talks to.
    fn host(&self) -> &str;

    /// Open the connection to the switch.
    fn open(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Close the connection.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Send a command and wait for the prompt.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<Response>> + Send;

    /// Send multiple commands sequentially.
    fn send_commands(
        &mut self,
        commands: &[&str],
    ) -> impl Future<Output = Result<Vec<Response>>> + Send {
        async move {
            let mut responses = Vec::with_capacity(commands.len());
            for cmd in commands {
                responses.push(self.send_command(cmd).await?);
            }
            Ok(responses)
        }
    }

    /// Check if the driver is connected.
    fn is_open(&self) -> bool;
}
