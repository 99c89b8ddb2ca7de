//! Remote shell transport layer.
//!
//! The rest of the crate only sees the [`Transport`] and [`Connector`]
//! traits: connect, run one command, close. [`SshTransport`] is the russh
//! implementation used in production.

pub mod config;
#[cfg(test)]
pub(crate) mod mock;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use ssh::{SshConnector, SshTransport};

use async_trait::async_trait;

use crate::error::TransportError;

/// Outcome of one remote command, decoded lossily from the wire bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Exit status reported by the remote side.
    pub exit_status: u32,
}

impl CommandResult {
    /// Build a result from raw channel bytes. Invalid UTF-8 is replaced.
    pub fn from_bytes(stdout: &[u8], stderr: &[u8], exit_status: u32) -> Self {
        Self {
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
            exit_status,
        }
    }

    /// Check if the command exited with status zero.
    pub fn is_success(&self) -> bool {
        self.exit_status == 0
    }

    /// Standard output with surrounding whitespace removed.
    pub fn output(&self) -> &str {
        self.stdout.trim()
    }
}

/// An open, authenticated remote shell connection.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run a single command to completion.
    ///
    /// A non-zero exit status is not an error at this layer; it is reported
    /// in the returned [`CommandResult`].
    async fn exec(&mut self, command: &str) -> Result<CommandResult, TransportError>;

    /// Close the connection.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Factory for transports, so the session layer never names russh directly.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect and authenticate, bounded by `config.timeout`.
    async fn connect(&self, config: &SshConfig) -> Result<Box<dyn Transport>, TransportError>;
}
