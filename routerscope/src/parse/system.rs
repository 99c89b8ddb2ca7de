//! Firmware release and service status probes.

/// Version from a `DISTRIB_RELEASE='23.05.2'` line of `/etc/openwrt_release`.
///
/// Takes the text between the first and second `=`, drops single quotes and
/// trims. `None` only if the line has no `=`; an empty value stays empty.
pub fn parse_release_version(line: &str) -> Option<String> {
    let value = line.split('=').nth(1)?.replace('\'', "");
    Some(value.trim().to_string())
}

/// Whether `/etc/init.d/firewall status` output reports a running service.
pub fn firewall_running(status: &str) -> bool {
    let status = status.to_ascii_lowercase();
    status.contains("running") && !status.contains("not running") && !status.contains("inactive")
}
