//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use bytes::BytesMut;
use log::{debug, warn};
use russh::ChannelMsg;
use russh::client::{self, Handle};
use russh::keys::PublicKey;
use secrecy::ExposeSecret;

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use super::{CommandResult, Connector, Transport};
use crate::error::TransportError;

/// SSH extended data stream number for stderr.
const SSH_EXTENDED_DATA_STDERR: u32 = 1;

/// SSH transport wrapping a russh client session.
///
/// Every command runs on its own `exec` channel, so an abandoned command
/// does not poison the connection for the next one.
pub struct SshTransport {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// Host this transport is connected to, for log context.
    host: String,
}

impl SshTransport {
    /// Connect to the SSH server and authenticate, bounded by `config.timeout`.
    pub async fn connect(config: &SshConfig) -> Result<Self, TransportError> {
        tokio::time::timeout(config.timeout, Self::establish(config))
            .await
            .map_err(|_| TransportError::Timeout(config.timeout))?
    }

    async fn establish(config: &SshConfig) -> Result<Self, TransportError> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: None,
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        debug!("Connecting to {}", config.socket_addr());

        let mut session = client::connect(ssh_config, (config.host.as_str(), config.port), handler)
            .await
            .map_err(|e| {
                // Prefer the detailed error stored by check_server_key over
                // the generic russh::Error::UnknownKey.
                if let Some(hk_err) = host_key_error
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take()
                {
                    return hk_err;
                }
                match e {
                    russh::Error::IO(source) => TransportError::ConnectionFailed {
                        host: config.host.clone(),
                        port: config.port,
                        source,
                    },
                    other => TransportError::Ssh(other),
                }
            })?;

        Self::authenticate(&mut session, config).await?;

        Ok(Self {
            session,
            host: config.host.clone(),
        })
    }

    /// Authenticate with the server.
    async fn authenticate(
        session: &mut Handle<SshHandler>,
        config: &SshConfig,
    ) -> Result<(), TransportError> {
        let success = match &config.auth {
            AuthMethod::Password(password) => session
                .authenticate_password(&config.username, password.expose_secret())
                .await?
                .success(),
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Transport for SshTransport {
    async fn exec(&mut self, command: &str) -> Result<CommandResult, TransportError> {
        if self.session.is_closed() {
            return Err(TransportError::Disconnected);
        }
        let mut channel = self.session.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut stdout = BytesMut::new();
        let mut stderr = BytesMut::new();
        let mut exit_status = None;

        // Exit status may arrive before the last data frames; drain until close.
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext } if ext == SSH_EXTENDED_DATA_STDERR => {
                    stderr.extend_from_slice(data)
                }
                ChannelMsg::ExitStatus { exit_status: code } => exit_status = Some(code),
                _ => {}
            }
        }

        let exit_status = exit_status.ok_or(TransportError::NoExitStatus)?;
        Ok(CommandResult::from_bytes(&stdout, &stderr, exit_status))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if self.session.is_closed() {
            return Err(TransportError::Disconnected);
        }
        debug!("Disconnecting from {}", self.host);
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await?;
        Ok(())
    }
}

/// Production [`Connector`] that opens [`SshTransport`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshConnector;

#[async_trait]
impl Connector for SshConnector {
    async fn connect(&self, config: &SshConfig) -> Result<Box<dyn Transport>, TransportError> {
        let transport = SshTransport::connect(config).await?;
        Ok(Box::new(transport))
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Detailed host-key error for connect() to surface.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
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

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        *self
            .host_key_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        let accepted = match self.host_key_verification {
            HostKeyVerification::Disabled => true,

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => true,
                Ok(false) => {
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key for {}: {}", self.host, e);
                    }
                    true
                }
                Err(e) => self.reject(e),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => true,
                Ok(false) => self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                }),
                Err(e) => self.reject(e),
            },
        };

        Ok(accepted)
    }
}
