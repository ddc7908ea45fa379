//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use russh::Channel;
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use secrecy::ExposeSecret;

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use crate::error::{Result, TransportError};

/// An authenticated SSH session to one switch.
pub struct SshTransport {
    session: Handle<SshHandler>,
    host: String,
    terminal_width: u32,
    terminal_height: u32,
}

impl SshTransport {
    /// Connect to the switch and authenticate.
    pub async fn connect(config: &SshConfig) -> Result<Self> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });

        let rejection: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));
        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            verification: config.host_key_verification,
            known_hosts_path: config.known_hosts_path.clone(),
            rejection: rejection.clone(),
        };

        debug!("connecting to {}", config.socket_addr());
        let mut session = tokio::time::timeout(
            config.timeout,
            client::connect(ssh_config, (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|e| {
            // Prefer the host key reason over russh's generic UnknownKey.
            let stored = rejection.lock().ok().and_then(|mut slot| slot.take());
            stored.unwrap_or(TransportError::Ssh(e))
        })?;

        authenticate(&mut session, config).await?;

        Ok(Self {
            session,
            host: config.host.clone(),
            terminal_width: config.terminal_width,
            terminal_height: config.terminal_height,
        })
    }

    /// Open a session channel with a PTY and an interactive shell.
    pub async fn open_shell(&self) -> Result<Channel<Msg>> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_pty(
                true,
                "vt100",
                self.terminal_width,
                self.terminal_height,
                0,
                0,
                &[],
            )
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        Ok(channel)
    }

    /// Disconnect from the switch.
    pub async fn close(self) -> Result<()> {
        debug!("disconnecting from {}", self.host);
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

async fn authenticate(session: &mut Handle<SshHandler>, config: &SshConfig) -> Result<()> {
    let user = config.username.as_str();
    let success = match &config.auth {
        AuthMethod::None => session
            .authenticate_none(user)
            .await
            .map_err(TransportError::Ssh)?
            .success(),
        AuthMethod::Password(password) => session
            .authenticate_password(user, password.expose_secret())
            .await
            .map_err(TransportError::Ssh)?
            .success(),
        AuthMethod::PrivateKey { path, passphrase } => {
            let key = load_secret_key(path, passphrase.as_ref().map(|p| p.expose_secret()))
                .map_err(|e| TransportError::Key(e.to_string()))?;

            let hash_alg = session
                .best_supported_rsa_hash()
                .await
                .map_err(TransportError::Ssh)?
                .flatten();

            session
                .authenticate_publickey(user, PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg))
                .await
                .map_err(TransportError::Ssh)?
                .success()
        }
    };

    if !success {
        return Err(TransportError::AuthenticationFailed {
            user: config.username.clone(),
        }
        .into());
    }

    Ok(())
}

/// What to do with a server key after consulting known_hosts.
#[derive(Debug)]
enum HostKeyDecision {
    Accept,
    Learn,
    Reject(TransportError),
}

/// Apply the verification mode to a known_hosts lookup.
///
/// `lookup` is `Ok(true)` for a matching entry, `Ok(false)` when the host is
/// absent, and `Err` when the entry differs or the file is unusable.
fn decide(
    mode: HostKeyVerification,
    host: &str,
    port: u16,
    lookup: impl FnOnce() -> std::result::Result<bool, TransportError>,
) -> HostKeyDecision {
    match mode {
        HostKeyVerification::Disabled => HostKeyDecision::Accept,
        HostKeyVerification::AcceptNew => match lookup() {
            Ok(true) => HostKeyDecision::Accept,
            Ok(false) => HostKeyDecision::Learn,
            Err(e) => HostKeyDecision::Reject(e),
        },
        HostKeyVerification::Strict => match lookup() {
            Ok(true) => HostKeyDecision::Accept,
            Ok(false) => HostKeyDecision::Reject(TransportError::HostKeyUnknown {
                host: host.to_string(),
                port,
            }),
            Err(e) => HostKeyDecision::Reject(e),
        },
    }
}

/// russh client callbacks.
struct SshHandler {
    host: String,
    port: u16,
    verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Detailed rejection reason, read back by `connect`.
    rejection: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    fn lookup(&self, key: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = match &self.known_hosts_path {
            Some(path) => russh::keys::check_known_hosts_path(&self.host, self.port, key, path),
            None => russh::keys::check_known_hosts(&self.host, self.port, key),
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    fn learn(&self, key: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = match &self.known_hosts_path {
            Some(path) => {
                russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, key, path)
            }
            None => russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, key),
        };
        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match decide(self.verification, &self.host, self.port, || {
            self.lookup(server_public_key)
        }) {
            HostKeyDecision::Accept => Ok(true),
            HostKeyDecision::Learn => {
                if let Err(e) = self.learn(server_public_key) {
                    warn!("{}: failed to save host key: {}", self.host, e);
                }
                Ok(true)
            }
            HostKeyDecision::Reject(reason) => {
                if let Ok(mut slot) = self.rejection.lock() {
                    *slot = Some(reason);
                }
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed() -> std::result::Result<bool, TransportError> {
        Err(TransportError::HostKeyChanged {
            host: "sw1".into(),
            port: 22,
            line: 3,
        })
    }

    #[test]
    fn test_disabled_never_consults_known_hosts() {
        let decision = decide(HostKeyVerification::Disabled, "sw1", 22, || {
            panic!("lookup must not run")
        });
        assert!(matches!(decision, HostKeyDecision::Accept));
    }

    #[test]
    fn test_accept_new_learns_unknown_hosts() {
        assert!(matches!(
            decide(HostKeyVerification::AcceptNew, "sw1", 22, || Ok(false)),
            HostKeyDecision::Learn
        ));
        assert!(matches!(
            decide(HostKeyVerification::AcceptNew, "sw1", 22, || Ok(true)),
            HostKeyDecision::Accept
        ));
        assert!(matches!(
            decide(HostKeyVerification::AcceptNew, "sw1", 22, changed),
            HostKeyDecision::Reject(TransportError::HostKeyChanged { line: 3, .. })
        ));
    }

    #[test]
    fn test_strict_rejects_unknown_hosts() {
        match decide(HostKeyVerification::Strict, "sw1", 2222, || Ok(false)) {
            HostKeyDecision::Reject(TransportError::HostKeyUnknown { host, port }) => {
                assert_eq!(host, "sw1");
                assert_eq!(port, 2222);
            }
            other => panic!("unexpected decision: {:?}", other),
        }
        assert!(matches!(
            decide(HostKeyVerification::Strict, "sw1", 22, || Ok(true)),
            HostKeyDecision::Accept
        ));
    }
}
