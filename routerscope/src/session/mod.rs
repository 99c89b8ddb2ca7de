//! Authenticated router sessions.
//!
//! A [`Session`] owns exactly one transport handle. Commands on a session are
//! serialized by a per-session lock, and each one is bounded by a timeout
//! after which the in-flight call is dropped.

mod registry;

pub use registry::SessionRegistry;

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{CommandError, Error, Result, TransportError};
use crate::transport::{CommandResult, Connector, SshConfig, Transport};

/// Default bound on a single remote command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Opaque session identifier (random UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = Error;

    /// Anything that is not a UUID can never name a session, so it is
    /// reported as not found.
    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::not_found(s))
    }
}

/// One authenticated connection to a router's command shell.
pub struct Session {
    id: SessionId,
    host: String,
    port: u16,
    username: String,
    connected_at: DateTime<Utc>,
    command_timeout: Duration,

    /// `None` once closed. The lock doubles as the per-session execution lock.
    transport: Mutex<Option<Box<dyn Transport>>>,
}

impl Session {
    /// Wrap an already authenticated transport in a new session.
    pub fn new(config: &SshConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            id: SessionId::new(),
            host: config.host.clone(),
            port: config.port,
            username: config.username.clone(),
            connected_at: Utc::now(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            transport: Mutex::new(Some(transport)),
        }
    }

    /// Connect through `connector` and wrap the result.
    ///
    /// The whole attempt is bounded by `config.timeout`. Fails with
    /// [`Error::Connection`]; no session exists in that case.
    pub async fn connect(connector: &dyn Connector, config: &SshConfig) -> Result<Self> {
        let transport = tokio::time::timeout(config.timeout, connector.connect(config))
            .await
            .map_err(|_| TransportError::Timeout(config.timeout))
            .and_then(|connected| connected)
            .map_err(Error::Connection)?;
        Ok(Self::new(config, transport))
    }

    /// Set the default timeout used by [`run`](Self::run).
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Run a command with the session's default timeout.
    pub async fn run(&self, command: &str) -> std::result::Result<CommandResult, CommandError> {
        self.run_with_timeout(command, self.command_timeout).await
    }

    /// Run a command, failing if it exits non-zero or outlives `timeout`.
    ///
    /// Waiting for the session lock is not counted against `timeout`; the
    /// holder is itself bounded by its own timeout.
    pub async fn run_with_timeout(
        &self,
        command: &str,
        timeout: Duration,
    ) -> std::result::Result<CommandResult, CommandError> {
        let mut guard = self.transport.lock().await;
        let transport = guard.as_mut().ok_or(CommandError::SessionClosed)?;

        debug!("[{}] running: {}", self.id, command);
        let start = Instant::now();

        let result = tokio::time::timeout(timeout, transport.exec(command))
            .await
            .map_err(|_| CommandError::Timeout {
                command: command.to_string(),
                timeout,
            })?
            .map_err(|source| CommandError::Transport {
                command: command.to_string(),
                source,
            })?;

        debug!(
            "[{}] '{}' exited {} in {:?}",
            self.id,
            command,
            result.exit_status,
            start.elapsed()
        );

        if !result.is_success() {
            let stderr = result.stderr.trim();
            let message = if stderr.is_empty() {
                format!("Command failed with code {}", result.exit_status)
            } else {
                stderr.to_string()
            };
            return Err(CommandError::NonZeroExit {
                command: command.to_string(),
                status: result.exit_status,
                message,
            });
        }

        Ok(result)
    }

    /// Run a command and return its trimmed stdout.
    pub async fn output(&self, command: &str) -> std::result::Result<String, CommandError> {
        let result = self.run(command).await?;
        Ok(result.output().to_string())
    }

    /// Check whether the transport has not been closed yet.
    pub async fn is_open(&self) -> bool {
        self.transport.lock().await.is_some()
    }

    /// Release the transport. Idempotent; failures are only logged.
    pub async fn close(&self) {
        let transport = self.transport.lock().await.take();
        if let Some(mut transport) = transport {
            if let Err(e) = transport.close().await {
                warn!("[{}] error while closing connection to {}: {}", self.id, self.host, e);
            }
        }
    }

    /// Snapshot of the session's identifying fields.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            connected_at: self.connected_at,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("connected_at", &self.connected_at)
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

/// Serializable description of an active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: SessionId,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub connected_at: DateTime<Utc>,
}
