//! Builder for creating a router manager.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::RouterManager;
use crate::error::{Error, Result};
use crate::session::{DEFAULT_COMMAND_TIMEOUT, SessionRegistry};
use crate::transport::{Connector, HostKeyVerification, SshConnector};

/// Default bound on connect + authenticate.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default value reported by [`RouterManager::health`].
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Builder for constructing a [`RouterManager`].
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use routerscope::{HostKeyVerification, ManagerBuilder};
///
/// # fn example() -> Result<(), routerscope::Error> {
/// let manager = ManagerBuilder::new()
///     .command_timeout(Duration::from_secs(5))
///     .host_key_verification(HostKeyVerification::Strict)
///     .environment("production")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ManagerBuilder {
    connect_timeout: Duration,
    command_timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    environment: String,
    connector: Arc<dyn Connector>,
}

impl ManagerBuilder {
    /// Create a builder with the default settings.
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            connector: Arc::new(SshConnector),
        }
    }

    /// Set the connect + authentication timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the default per-command timeout for new sessions.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Set how router host keys are verified.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a known_hosts file other than `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Set the environment name reported by health checks.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Replace the transport connector (defaults to [`SshConnector`]).
    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    /// Build the manager.
    pub fn build(self) -> Result<RouterManager> {
        if self.connect_timeout.is_zero() {
            return Err(Error::InvalidConfig {
                message: "connect timeout must be non-zero".to_string(),
            });
        }
        if self.command_timeout.is_zero() {
            return Err(Error::InvalidConfig {
                message: "command timeout must be non-zero".to_string(),
            });
        }

        Ok(RouterManager {
            registry: SessionRegistry::new(),
            connector: self.connector,
            connect_timeout: self.connect_timeout,
            command_timeout: self.command_timeout,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
            environment: self.environment,
        })
    }
}

impl Default for ManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
