//! Error types for routerscope.
//!
//! There is deliberately no parse error here: every output parser is total
//! and degrades to a default value.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for routerscope operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Connecting or authenticating to the router failed; no session was created.
    #[error("SSH connection failed: {0}")]
    Connection(#[source] TransportError),

    /// The session identifier is unknown (or not a valid identifier at all).
    #[error("Connection not found: {id}")]
    NotFound { id: String },

    /// A remote command failed or timed out.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// A MAC address that cannot be safely placed in a firewall rule.
    #[error("Invalid MAC address: '{mac}'")]
    InvalidMac { mac: String },

    /// A session with this identifier is already registered.
    #[error("Session already registered: {id}")]
    DuplicateSession { id: String },

    /// Invalid configuration in the manager builder.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    /// Build a `NotFound` error for any displayable identifier.
    pub fn not_found(id: impl ToString) -> Self {
        Error::NotFound { id: id.to_string() }
    }

    /// Returns `true` if this error means the identifier was not resolved.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Transport layer errors (SSH connection, authentication, channels).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Host is not present in known_hosts and verification is strict
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// The SSH connection is no longer open
    #[error("Connection disconnected")]
    Disconnected,

    /// The channel closed without reporting an exit status
    #[error("Channel closed without an exit status")]
    NoExitStatus,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors from running a single command on an open session.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The command exited with a non-zero status; `message` is the reason.
    #[error("{message}")]
    NonZeroExit {
        command: String,
        status: u32,
        message: String,
    },

    /// The command did not finish within its timeout and was abandoned.
    #[error("Command '{command}' timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// The transport failed while running the command.
    #[error("Command '{command}' failed: {source}")]
    Transport {
        command: String,
        #[source]
        source: TransportError,
    },

    /// The session was already closed.
    #[error("Session is closed")]
    SessionClosed,
}

/// Result type alias using routerscope's Error.
pub type Result<T> = std::result::Result<T, Error>;
