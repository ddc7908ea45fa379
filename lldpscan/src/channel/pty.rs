//! Interactive PTY channel to a switch CLI.

use std::time::Duration;

use log::{debug, trace};
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};
use tokio::time::Instant;

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// Bytes searched from the end of the buffer when looking for a prompt.
pub const DEFAULT_SEARCH_DEPTH: usize = 1000;

/// A shell channel with pattern-based reads.
pub struct PtyChannel {
    /// The russh session channel (PTY + shell already requested).
    channel: Channel<Msg>,

    /// Output received but not yet consumed by a read.
    buffer: PatternBuffer,
}

impl PtyChannel {
    /// Wrap an open shell channel.
    pub fn new(channel: Channel<Msg>) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::new(DEFAULT_SEARCH_DEPTH),
        }
    }

    /// Send a line of input, terminated with a carriage return.
    pub async fn send(&mut self, line: &str) -> Result<()> {
        trace!("send: {:?}", line);
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\r');
        self.channel
            .data(data.as_slice())
            .await
            .map_err(ChannelError::Ssh)?;
        Ok(())
    }

    /// Read until `pattern` appears in the tail of the output.
    ///
    /// Returns everything accumulated up to and including the match, with
    /// escape sequences removed. Output after the match stays buffered.
    pub async fn read_until(&mut self, pattern: &Regex, timeout: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(end) = self.tail_match_end(pattern) {
                let mut data = self.buffer.take();
                let rest = data.split_off(end);
                self.buffer.extend(&rest);
                return Ok(data);
            }

            let msg = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| {
                    debug!(
                        "timed out after {:?}; tail: {:?}",
                        timeout,
                        String::from_utf8_lossy(self.buffer.tail())
                    );
                    ChannelError::PatternTimeout(timeout)
                })?;

            match msg {
                Some(ChannelMsg::Data { ref data }) => self.buffer.extend(data),
                Some(ChannelMsg::ExtendedData { ref data, .. }) => self.buffer.extend(data),
                Some(ChannelMsg::Eof | ChannelMsg::Close) | None => {
                    return Err(ChannelError::Closed.into());
                }
                Some(other) => trace!("ignoring channel message: {:?}", other),
            }
        }
    }

    /// Absolute end offset of a pattern match in the buffer tail.
    fn tail_match_end(&self, pattern: &Regex) -> Option<usize> {
        let tail_start = self.buffer.len() - self.buffer.tail().len();
        self.buffer.search_tail(pattern).map(|m| tail_start + m.end())
    }

    /// Send EOF and close the channel.
    pub async fn close(self) -> Result<()> {
        let _ = self.channel.eof().await;
        self.channel.close().await.map_err(ChannelError::Ssh)?;
        Ok(())
    }
}
