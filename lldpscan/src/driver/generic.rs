//! SSH-backed driver for any registered platform.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use regex::bytes::Regex;

use super::Driver;
use super::response::Response;
use crate::channel::PtyChannel;
use crate::error::{DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::transport::{SshConfig, SshTransport};

/// An open SSH session and its shell channel.
struct Session {
    transport: SshTransport,
    channel: PtyChannel,
}

/// Driver that runs CLI commands on a switch over an SSH shell.
///
/// Handles:
/// - the login banner some platforms show before their first prompt
/// - paging and terminal setup commands
/// - prompt detection, echo stripping and failure-string detection
pub struct GenericDriver {
    ssh_config: SshConfig,
    platform: PlatformDefinition,
    timeout: Duration,
    /// Prompt or login banner, whichever comes first after connecting.
    login_pattern: Regex,
    session: Option<Session>,
}

impl GenericDriver {
    /// Create a driver. Nothing is connected until [`Driver::open`].
    pub fn new(ssh_config: SshConfig, platform: PlatformDefinition) -> Self {
        let timeout = ssh_config.timeout;
        let login_pattern = Self::build_login_pattern(&platform);
        Self {
            ssh_config,
            platform,
            timeout,
            login_pattern,
            session: None,
        }
    }

    fn build_login_pattern(platform: &PlatformDefinition) -> Regex {
        match &platform.continue_pattern {
            Some(banner) => Regex::new(&format!(
                "(?:{})|(?:{})",
                platform.prompt_pattern.as_str(),
                banner.as_str()
            ))
            .unwrap_or_else(|_| platform.prompt_pattern.clone()),
            None => platform.prompt_pattern.clone(),
        }
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Wait for the first prompt, dismissing the login banner if one appears.
    async fn await_first_prompt(&mut self) -> Result<()> {
        let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;

        let data = session
            .channel
            .read_until(&self.login_pattern, self.timeout)
            .await?;

        let at_banner = self
            .platform
            .continue_pattern
            .as_ref()
            .is_some_and(|banner| banner.is_match(&data))
            && !self.platform.prompt_pattern.is_match(&data);

        if at_banner {
            debug!("{}: dismissing login banner", self.ssh_config.host);
            session.channel.send("").await?;
            session
                .channel
                .read_until(&self.platform.prompt_pattern, self.timeout)
                .await?;
        }

        Ok(())
    }

    async fn run_on_open_commands(&mut self) -> Result<()> {
        for command in self.platform.on_open_commands.clone() {
            let response = self.send_command(&command).await?;
            if !response.is_success() {
                warn!(
                    "{}: setup command {:?} failed: {}",
                    self.ssh_config.host,
                    command,
                    response.failure_message.unwrap_or_default()
                );
            }
        }
        Ok(())
    }
}

impl Driver for GenericDriver {
    fn host(&self) -> &str {
        &self.ssh_config.host
    }

    async fn open(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        let transport = SshTransport::connect(&self.ssh_config).await?;
        let channel = PtyChannel::new(transport.open_shell().await?);
        self.session = Some(Session { transport, channel });

        self.await_first_prompt().await?;
        self.run_on_open_commands().await?;

        info!(
            "connected to {} ({})",
            self.ssh_config.socket_addr(),
            self.platform.name
        );
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.channel.close().await {
                debug!("{}: channel close: {}", self.ssh_config.host, e);
            }
            session.transport.close().await?;
            info!("connection to {} closed", self.ssh_config.host);
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<Response> {
        let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;
        let start = Instant::now();

        session.channel.send(command).await?;
        let data = session
            .channel
            .read_until(&self.platform.prompt_pattern, self.timeout)
            .await?;

        let elapsed = start.elapsed();
        let raw_result = String::from_utf8_lossy(&data).into_owned();
        let prompt = last_line(&raw_result).trim().to_string();
        let result = normalize_output(&raw_result, command);

        debug!(
            "{}: {:?} returned {} bytes in {:?}",
            self.ssh_config.host,
            command,
            result.len(),
            elapsed
        );

        let response = Response::new(command, result, raw_result, prompt, elapsed);
        match self.platform.detect_failure(&response.result) {
            Some(failure) => {
                let failure = failure.to_string();
                Ok(response.with_failure(failure))
            }
            None => Ok(response),
        }
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }
}

/// Text after the last newline.
fn last_line(text: &str) -> &str {
    match memchr::memrchr(b'\n', text.as_bytes()) {
        Some(pos) => &text[pos + 1..],
        None => text,
    }
}

/// Strip the command echo and the trailing prompt line, and drop carriage returns.
pub(crate) fn normalize_output(raw: &str, command: &str) -> String {
    let text = raw.replace('\r', "");

    let body = match text.split_once('\n') {
        Some((first, rest)) if first.trim_end().ends_with(command.trim()) => rest,
        Some(_) => text.as_str(),
        // Only one line: the prompt itself.
        None => return String::new(),
    };

    match memchr::memrchr(b'\n', body.as_bytes()) {
        Some(pos) => body[..pos].to_string(),
        None => String::new(),
    }
}
