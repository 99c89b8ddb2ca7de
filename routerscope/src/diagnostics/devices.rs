//! Connected devices and per-device firewall blocking.

use std::fmt;
use std::str::FromStr;

use log::info;

use super::{commands, probe};
use crate::error::{Error, Result};
use crate::parse::{Device, parse_dhcp_leases};
use crate::session::Session;

/// A validated MAC address, normalized to upper-case colon form.
///
/// Only this type can reach a firewall command, so arbitrary request input
/// is never interpolated into a shell line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl FromStr for MacAddress {
    type Err = Error;

    /// Accepts `aa:bb:cc:dd:ee:ff` or `aa-bb-cc-dd-ee-ff`, any case.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMac { mac: s.to_string() };

        let separator = if s.contains(':') { ':' } else { '-' };
        let parts: Vec<&str> = s.split(separator).collect();
        if parts.len() != 6 {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (octet, part) in octets.iter_mut().zip(&parts) {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Devices from the DHCP lease table; empty if the table cannot be read.
pub async fn devices(session: &Session) -> Vec<Device> {
    probe(session, commands::DHCP_LEASES)
        .await
        .map(|leases| parse_dhcp_leases(&leases))
        .unwrap_or_default()
}

/// Insert (`blocked = true`) or delete the FORWARD DROP rule for `mac`.
///
/// Any command failure is returned to the caller.
pub async fn set_blocked(session: &Session, mac: &MacAddress, blocked: bool) -> Result<()> {
    session.run(&commands::mac_drop_rule(mac, blocked)).await?;
    if blocked {
        info!("[{}] Blocked device: {}", session.id(), mac);
    } else {
        info!("[{}] Unblocked device: {}", session.id(), mac);
    }
    Ok(())
}
