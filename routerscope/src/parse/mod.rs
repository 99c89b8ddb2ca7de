//! Parsers for router command output.
//!
//! Every parser here is total: malformed input yields a conservative
//! default, never an error. Router firmware varies too much for anything
//! stricter to be useful on read-only paths.

mod leases;
mod stats;
mod system;

pub use leases::{Device, DeviceStatus, LEASE_EXPIRY_FORMAT, parse_dhcp_leases, parse_dhcp_leases_in};
pub use stats::{parse_cpu_usage, parse_disk_usage, parse_memory_usage};
pub use system::{firewall_running, parse_release_version};
