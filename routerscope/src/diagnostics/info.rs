//! Router identification and interface listing.

use serde::Serialize;

use super::{commands, probe};
use crate::parse::parse_release_version;
use crate::session::Session;

/// Hostname reported when the `uci` probe fails.
pub const DEFAULT_HOSTNAME: &str = "OpenWRT";

/// Placeholder for an uptime or version that could not be read.
pub const UNKNOWN: &str = "Unknown";

/// Model reported for every router.
pub const ROUTER_MODEL: &str = "OpenWRT Virtual Router";

/// Returned by [`interfaces`] when `ifconfig` fails.
pub const INTERFACES_UNAVAILABLE: &str = "Unable to fetch interfaces";

/// Basic identification gathered right after connecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterInfo {
    pub hostname: String,
    pub uptime: String,
    pub version: String,
    pub model: String,
}

/// Probe hostname, uptime and firmware version. Each field falls back to
/// its own default independently.
pub async fn router_info(session: &Session) -> RouterInfo {
    let hostname = probe(session, commands::HOSTNAME)
        .await
        .unwrap_or_else(|| DEFAULT_HOSTNAME.to_string());

    let uptime = probe(session, commands::UPTIME)
        .await
        .unwrap_or_else(|| UNKNOWN.to_string());

    let version = probe(session, commands::RELEASE)
        .await
        .and_then(|line| parse_release_version(&line))
        .unwrap_or_else(|| UNKNOWN.to_string());

    RouterInfo {
        hostname,
        uptime,
        version,
        model: ROUTER_MODEL.to_string(),
    }
}

/// Raw `ifconfig` output, or [`INTERFACES_UNAVAILABLE`].
pub async fn interfaces(session: &Session) -> String {
    probe(session, commands::INTERFACES)
        .await
        .unwrap_or_else(|| INTERFACES_UNAVAILABLE.to_string())
}
