//! Router manager: the entry point an HTTP layer holds.
//!
//! The manager owns the session registry and the transport connector.
//! Every operation except [`connect`](RouterManager::connect) and
//! [`health`](RouterManager::health) first resolves a session identifier and
//! fails with [`Error::NotFound`](crate::Error::NotFound) if it is unknown.

mod builder;

pub use builder::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENVIRONMENT, ManagerBuilder};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{info, warn};
use secrecy::SecretString;
use serde::Serialize;

use crate::diagnostics::{self, AuditFinding, MacAddress, RouterConfig, RouterInfo, SystemStats};
use crate::error::Result;
use crate::parse::Device;
use crate::session::{Session, SessionId, SessionRegistry, SessionSummary};
use crate::transport::{AuthMethod, Connector, HostKeyVerification, SshConfig};

/// Where and how to connect to a router.
#[derive(Debug)]
pub struct RouterTarget {
    host: String,
    port: u16,
    username: String,
    password: SecretString,
}

impl RouterTarget {
    /// Target `host` on port 22 with password authentication.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Result of a successful connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub connection_id: SessionId,
    pub router_info: RouterInfo,
}

/// Liveness snapshot; never touches a router.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: String,
    pub active_connections: usize,
    pub timestamp: DateTime<Local>,
    pub environment: String,
}

/// Owns every live router session and runs diagnostics against them.
pub struct RouterManager {
    registry: SessionRegistry,
    connector: Arc<dyn Connector>,
    connect_timeout: Duration,
    command_timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    environment: String,
}

impl RouterManager {
    /// Start configuring a manager.
    pub fn builder() -> ManagerBuilder {
        ManagerBuilder::new()
    }

    /// The underlying session registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    fn ssh_config(&self, target: RouterTarget) -> SshConfig {
        SshConfig {
            host: target.host,
            port: target.port,
            username: target.username,
            auth: AuthMethod::Password(target.password),
            timeout: self.connect_timeout,
            host_key_verification: self.host_key_verification.clone(),
            known_hosts_path: self.known_hosts_path.clone(),
        }
    }

    fn resolve(&self, id: &str) -> Result<Arc<Session>> {
        let id: SessionId = id.parse()?;
        self.registry.lookup(&id)
    }

    /// Authenticate to a router, probe its identity and register the session.
    ///
    /// Identity probes never fail the connect; each field falls back to its
    /// documented default instead.
    pub async fn connect(&self, target: RouterTarget) -> Result<Connection> {
        let config = self.ssh_config(target);

        let session = match Session::connect(self.connector.as_ref(), &config).await {
            Ok(session) => Arc::new(session.with_command_timeout(self.command_timeout)),
            Err(e) => {
                warn!("Connection to {} failed: {}", config.socket_addr(), e);
                return Err(e);
            }
        };

        let router_info = diagnostics::router_info(&session).await;

        if let Err(e) = self.registry.register(session.clone()) {
            session.close().await;
            return Err(e);
        }

        info!("New connection: {} to {}", session.id(), config.host);
        Ok(Connection {
            connection_id: session.id(),
            router_info,
        })
    }

    /// Close and forget a session.
    pub async fn disconnect(&self, id: &str) -> Result<()> {
        let id: SessionId = id.parse()?;
        self.registry.remove(&id).await?;
        info!("Disconnected: {}", id);
        Ok(())
    }

    /// CPU, memory and storage utilisation.
    pub async fn stats(&self, id: &str) -> Result<SystemStats> {
        let session = self.resolve(id)?;
        Ok(diagnostics::stats(&session).await)
    }

    /// Devices holding a DHCP lease.
    pub async fn devices(&self, id: &str) -> Result<Vec<Device>> {
        let session = self.resolve(id)?;
        Ok(diagnostics::devices(&session).await)
    }

    /// Block or unblock a device's forwarded traffic by MAC address.
    pub async fn set_blocked(&self, id: &str, mac: &str, blocked: bool) -> Result<()> {
        let session = self.resolve(id)?;
        let mac: MacAddress = mac.parse()?;
        diagnostics::set_blocked(&session, &mac, blocked).await
    }

    /// Network, DHCP and firewall configuration files.
    pub async fn config(&self, id: &str) -> Result<RouterConfig> {
        let session = self.resolve(id)?;
        Ok(diagnostics::config(&session).await)
    }

    /// Security audit findings.
    pub async fn audit(&self, id: &str) -> Result<Vec<AuditFinding>> {
        let session = self.resolve(id)?;
        Ok(diagnostics::audit(&session).await)
    }

    /// Raw interface listing.
    pub async fn interfaces(&self, id: &str) -> Result<String> {
        let session = self.resolve(id)?;
        Ok(diagnostics::interfaces(&session).await)
    }

    /// Active sessions.
    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.registry.sessions().iter().map(|s| s.summary()).collect()
    }

    /// Service status from the registry alone.
    pub fn health(&self) -> Health {
        Health {
            status: "healthy".to_string(),
            active_connections: self.registry.len(),
            timestamp: Local::now(),
            environment: self.environment.clone(),
        }
    }

    /// Close every session. Call once before the process exits.
    pub async fn shutdown(&self) {
        info!("Closing all connections...");
        self.registry.close_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{AuditStatus, DEFAULT_HOSTNAME, UNKNOWN, commands};
    use crate::error::{CommandError, Error, TransportError};
    use crate::transport::mock::{ScriptedConnector, ScriptedTransport};

    const PASSWORD: &str = "admin";

    fn router() -> ScriptedTransport {
        ScriptedTransport::new()
            .reply(commands::HOSTNAME, "lab-router\n")
            .reply(commands::UPTIME, " 09:15:00 up 2:03,  load average: 0.10, 0.05, 0.01\n")
            .reply(commands::RELEASE, "DISTRIB_RELEASE='23.05.3'\n")
            .reply(commands::CPU, "CPU:   1% usr   1% sys   0% nic  98% idle   0% io\n")
            .reply(commands::MEMORY, "Mem:  1000  250  750  0  0  0\n")
            .reply(commands::DISK, "overlayfs:/overlay  104.0M  41.6M  62.4M  40% /\n")
    }

    fn manager(transport: ScriptedTransport) -> (RouterManager, Arc<ScriptedConnector>) {
        let connector = Arc::new(ScriptedConnector::new(transport, PASSWORD));
        let manager = RouterManager::builder()
            .connector(connector.clone())
            .environment("test")
            .build()
            .unwrap();
        (manager, connector)
    }

    fn target() -> RouterTarget {
        RouterTarget::new("192.168.1.1", "root", PASSWORD)
    }

    #[tokio::test]
    async fn test_connect_registers_session() {
        let (manager, connector) = manager(router());
        let connection = manager.connect(target().port(2222)).await.unwrap();

        assert_eq!(connector.connects(), 1);
        assert_eq!(connection.router_info.hostname, "lab-router");
        assert_eq!(connection.router_info.version, "23.05.3");
        assert_eq!(manager.health().active_connections, 1);

        let sessions = manager.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, connection.connection_id);
        assert_eq!(sessions[0].port, 2222);
        assert_eq!(sessions[0].username, "root");
    }

    #[tokio::test]
    async fn test_connect_with_failing_probes_uses_defaults() {
        let (manager, _) = manager(ScriptedTransport::new());
        let info = manager.connect(target()).await.unwrap().router_info;
        assert_eq!(info.hostname, DEFAULT_HOSTNAME);
        assert_eq!(info.uptime, UNKNOWN);
        assert_eq!(info.version, UNKNOWN);
        assert_eq!(info.model, "OpenWRT Virtual Router");
    }

    #[tokio::test]
    async fn test_bad_credentials_create_no_session() {
        let (manager, _) = manager(router());
        let err = manager
            .connect(RouterTarget::new("192.168.1.1", "root", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
        assert!(manager.registry().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unresponsive_router_times_out_without_session() {
        let connector = Arc::new(ScriptedConnector::new(router(), PASSWORD).hang_on_connect());
        let manager = RouterManager::builder()
            .connector(connector)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        let err = manager.connect(target()).await.unwrap_err();

        assert!(matches!(err, Error::Connection(TransportError::Timeout(_))));
        assert!(manager.registry().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect() {
        let transport = router();
        let journal = transport.journal();
        let (manager, _) = manager(transport);
        let id = manager.connect(target()).await.unwrap().connection_id.to_string();

        manager.disconnect(&id).await.unwrap();

        assert_eq!(journal.closes(), 1);
        assert!(manager.disconnect(&id).await.unwrap_err().is_not_found());
        assert!(manager.stats(&id).await.unwrap_err().is_not_found());
        assert_eq!(manager.health().active_connections, 0);
    }

    #[tokio::test]
    async fn test_unknown_identifiers_are_not_found() {
        let (manager, _) = manager(router());
        let unknown = SessionId::new().to_string();
        for id in [unknown.as_str(), "not-a-uuid", ""] {
            assert!(manager.stats(id).await.unwrap_err().is_not_found());
            assert!(manager.devices(id).await.unwrap_err().is_not_found());
            assert!(manager.config(id).await.unwrap_err().is_not_found());
            assert!(manager.audit(id).await.unwrap_err().is_not_found());
            assert!(manager.interfaces(id).await.unwrap_err().is_not_found());
            assert!(
                manager
                    .set_blocked(id, "AA:BB:CC:DD:EE:FF", true)
                    .await
                    .unwrap_err()
                    .is_not_found()
            );
        }
    }

    #[tokio::test]
    async fn test_stats_with_failing_memory_probe() {
        let (manager, _) = manager(router().fail(commands::MEMORY, 1, "free: not found"));
        let id = manager.connect(target()).await.unwrap().connection_id.to_string();
        let stats = manager.stats(&id).await.unwrap();
        assert_eq!(stats, SystemStats { cpu: 2, memory: 0, storage: 40 });
    }

    #[tokio::test]
    async fn test_block_device() {
        let block = "iptables -I FORWARD -m mac --mac-source AA:BB:CC:DD:EE:FF -j DROP";
        let transport = router().reply(block, "");
        let journal = transport.journal();
        let (manager, _) = manager(transport);
        let id = manager.connect(target()).await.unwrap().connection_id.to_string();

        manager.set_blocked(&id, "AA:BB:CC:DD:EE:FF", true).await.unwrap();
        assert_eq!(journal.commands().last().map(String::as_str), Some(block));
    }

    #[tokio::test]
    async fn test_block_failure_is_reported() {
        let block = "iptables -I FORWARD -m mac --mac-source AA:BB:CC:DD:EE:FF -j DROP";
        let (manager, _) = manager(router().fail(block, 4, "iptables: Resource temporarily unavailable."));
        let id = manager.connect(target()).await.unwrap().connection_id.to_string();

        let err = manager
            .set_blocked(&id, "aa:bb:cc:dd:ee:ff", true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Command(CommandError::NonZeroExit { status: 4, .. })
        ));
    }

    #[tokio::test]
    async fn test_block_rejects_invalid_mac_without_running_anything() {
        let transport = router();
        let journal = transport.journal();
        let (manager, _) = manager(transport);
        let id = manager.connect(target()).await.unwrap().connection_id.to_string();
        let before = journal.commands().len();

        let err = manager
            .set_blocked(&id, "AA:BB:CC:DD:EE:FF && reboot", true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMac { .. }));
        assert_eq!(journal.commands().len(), before);
    }

    #[tokio::test]
    async fn test_read_only_operations_degrade() {
        let (manager, _) = manager(router());
        let id = manager.connect(target()).await.unwrap().connection_id.to_string();

        assert!(manager.devices(&id).await.unwrap().is_empty());
        assert_eq!(manager.config(&id).await.unwrap().network, "N/A");
        assert_eq!(
            manager.interfaces(&id).await.unwrap(),
            "Unable to fetch interfaces"
        );
        let audit = manager.audit(&id).await.unwrap();
        assert_eq!(audit.len(), 4);
        assert_eq!(audit[2].status, AuditStatus::Pass);
    }

    #[tokio::test]
    async fn test_shutdown_closes_everything() {
        let transport = router();
        let journal = transport.journal();
        let (manager, _) = manager(transport);
        manager.connect(target()).await.unwrap();
        manager.connect(target()).await.unwrap();

        manager.shutdown().await;

        assert_eq!(journal.closes(), 2);
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn test_health_serialization() {
        let (manager, _) = manager(router());
        let json = serde_json::to_value(manager.health()).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["activeConnections"], 0);
        assert_eq!(json["environment"], "test");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_connection_serialization() {
        let connection = Connection {
            connection_id: SessionId::new(),
            router_info: RouterInfo {
                hostname: "OpenWRT".to_string(),
                uptime: UNKNOWN.to_string(),
                version: UNKNOWN.to_string(),
                model: "OpenWRT Virtual Router".to_string(),
            },
        };
        let json = serde_json::to_value(&connection).unwrap();
        assert_eq!(json["connectionId"], connection.connection_id.to_string());
        assert_eq!(json["routerInfo"]["hostname"], "OpenWRT");
    }
}
