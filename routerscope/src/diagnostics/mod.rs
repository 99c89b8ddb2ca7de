//! Diagnostic operations over an open [`Session`].
//!
//! Read-only operations favor availability: a failed probe degrades that one
//! field to a documented default and the rest of the result is still
//! returned. Mutating operations (firewall changes) propagate failures.

mod audit;
pub mod commands;
mod config;
mod devices;
mod info;
mod stats;

pub use audit::{AuditFinding, AuditStatus, audit};
pub use config::{CONFIG_UNAVAILABLE, RouterConfig, config};
pub use devices::{MacAddress, devices, set_blocked};
pub use info::{
    DEFAULT_HOSTNAME, INTERFACES_UNAVAILABLE, ROUTER_MODEL, RouterInfo, UNKNOWN, interfaces,
    router_info,
};
pub use stats::{SystemStats, stats};

use log::warn;

use crate::session::Session;

/// Run `command`, logging and returning `None` on failure.
pub(crate) async fn probe(session: &Session, command: &str) -> Option<String> {
    match session.output(command).await {
        Ok(output) => Some(output),
        Err(e) => {
            warn!("[{}] probe '{}' failed: {}", session.id(), command, e);
            None
        }
    }
}
