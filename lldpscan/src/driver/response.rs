//! Response type for command execution results.

use std::time::Duration;

use crate::error::{DriverError, Result};

/// Output of one command sent to a switch.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// Output with the command echo and trailing prompt removed.
    pub result: String,

    /// Output as read from the channel (escape sequences already stripped).
    pub raw_result: String,

    /// The prompt that ended the output.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Platform failure string found in the output, if any.
    pub failure_message: Option<String>,
}

impl Response {
    /// Create a new successful response.
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            raw_result: raw_result.into(),
            prompt: prompt.into(),
            elapsed,
            failure_message: None,
        }
    }

    /// Mark the response failed with the matched failure string.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }

    /// Turn a failed response into [`DriverError::CommandFailed`].
    pub fn ensure_success(self) -> Result<Self> {
        match self.failure_message {
            None => Ok(self),
            Some(message) => Err(DriverError::CommandFailed {
                command: self.command,
                message,
            }
            .into()),
        }
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_success() {
        let response = Response::new("show arp", "10.0.0.1 aa dynamic", "", "sw#", Duration::ZERO);
        assert!(response.is_success());
        assert_eq!(response.lines().count(), 1);
        assert!(response.ensure_success().is_ok());
    }

    #[test]
    fn test_failure_becomes_error() {
        let response = Response::new("show lldp", "Invalid input: lldp", "", "sw#", Duration::ZERO)
            .with_failure("Invalid input:");
        assert!(!response.is_success());
        match response.ensure_success() {
            Err(Error::Driver(DriverError::CommandFailed { command, message })) => {
                assert_eq!(command, "show lldp");
                assert_eq!(message, "Invalid input:");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
