//! dnsmasq DHCP lease table (`/tmp/dhcp.leases`).
//!
//! Each record is `<expiry-epoch> <mac> <ip> <hostname> <client-id>`, with
//! `*` standing in for an unknown hostname.

use std::fmt::Display;

use chrono::{Local, TimeZone};
use serde::Serialize;

/// Format used for [`Device::lease_expiry`].
pub const LEASE_EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Device state as reported by the lease table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Holds a lease.
    Active,
}

/// A client device derived from one lease record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// 1-based position of the record among all lines of the lease table,
    /// blank and malformed lines included.
    pub id: usize,
    pub name: String,
    pub ip: String,
    pub mac: String,
    pub status: DeviceStatus,
    /// Always `false` here; firewall rules are not visible in lease data.
    pub blocked: bool,
    pub lease_expiry: String,
}

/// Parse the lease table, formatting expiry times in the local time zone.
pub fn parse_dhcp_leases(leases: &str) -> Vec<Device> {
    parse_dhcp_leases_in(leases, &Local)
}

/// Parse the lease table, formatting expiry times in `tz`.
///
/// Blank lines, lines with fewer than four fields, and lines whose expiry
/// is not a valid epoch are skipped without affecting later records.
pub fn parse_dhcp_leases_in<Tz>(leases: &str, tz: &Tz) -> Vec<Device>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    leases
        .trim()
        .split('\n')
        .enumerate()
        .filter_map(|(idx, line)| parse_record(idx + 1, line, tz))
        .collect()
}

fn parse_record<Tz>(id: usize, line: &str, tz: &Tz) -> Option<Device>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return None;
    }

    let expiry = fields[0].parse::<i64>().ok()?;
    let lease_expiry = tz
        .timestamp_opt(expiry, 0)
        .single()?
        .format(LEASE_EXPIRY_FORMAT)
        .to_string();

    Some(Device {
        id,
        name: fields[3].to_string(),
        ip: fields[2].to_string(),
        mac: fields[1].to_string(),
        status: DeviceStatus::Active,
        blocked: false,
        lease_expiry,
    })
}
