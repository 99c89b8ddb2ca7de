//! UCI configuration file dump.

use serde::Serialize;

use super::{commands, probe};
use crate::session::Session;

/// Placeholder for a configuration file that could not be read.
pub const CONFIG_UNAVAILABLE: &str = "N/A";

/// Contents of the network, DHCP and firewall UCI files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterConfig {
    pub network: String,
    pub dhcp: String,
    pub firewall: String,
}

/// Read the three configuration files; each unreadable one is `N/A`.
pub async fn config(session: &Session) -> RouterConfig {
    RouterConfig {
        network: read_file(session, commands::NETWORK_CONFIG).await,
        dhcp: read_file(session, commands::DHCP_CONFIG).await,
        firewall: read_file(session, commands::FIREWALL_CONFIG).await,
    }
}

async fn read_file(session: &Session, command: &str) -> String {
    probe(session, command)
        .await
        .unwrap_or_else(|| CONFIG_UNAVAILABLE.to_string())
}
