//! Shell commands issued against OpenWrt routers.

use super::devices::MacAddress;

pub const HOSTNAME: &str = "uci get system.@system[0].hostname";
pub const UPTIME: &str = "uptime";
pub const RELEASE: &str = "cat /etc/openwrt_release | grep DISTRIB_RELEASE";

pub const CPU: &str = "top -bn1 | grep \"CPU:\"";
pub const MEMORY: &str = "free | grep Mem";
pub const DISK: &str = "df -h / | tail -1";

pub const DHCP_LEASES: &str = "cat /tmp/dhcp.leases";

pub const NETWORK_CONFIG: &str = "cat /etc/config/network";
pub const DHCP_CONFIG: &str = "cat /etc/config/dhcp";
pub const FIREWALL_CONFIG: &str = "cat /etc/config/firewall";
pub const DROPBEAR_CONFIG: &str = "cat /etc/config/dropbear";
pub const FIREWALL_STATUS: &str = "/etc/init.d/firewall status";

pub const INTERFACES: &str = "ifconfig";

/// iptables command inserting (`blocked`) or deleting the DROP rule for `mac`.
pub fn mac_drop_rule(mac: &MacAddress, blocked: bool) -> String {
    let action = if blocked { "-I" } else { "-D" };
    format!("iptables {action} FORWARD -m mac --mac-source {mac} -j DROP")
}
