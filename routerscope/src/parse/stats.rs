//! CPU, memory and disk usage from busybox `top`, `free` and `df`.

use std::sync::LazyLock;

use regex::Regex;

static CPU_IDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)%\s+idle").expect("valid CPU idle pattern"));

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)%").expect("valid percent pattern"));

/// CPU usage from a `top -bn1` summary line such as
/// `CPU:   2% usr   1% sys   0% nic  96% idle   0% io ...`.
///
/// Usage is `100 - idle`; 0 if no idle figure is found.
pub fn parse_cpu_usage(cpu_info: &str) -> u32 {
    CPU_IDLE
        .captures(cpu_info)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(|idle| 100u32.saturating_sub(idle))
        .unwrap_or(0)
}

/// Memory usage from a `free` row: `Mem: <total> <used> <free> ...`.
///
/// Returns `round(100 * used / total)` with ties to even, or 0 if the row
/// is short, non-numeric, or reports a zero total.
pub fn parse_memory_usage(mem_info: &str) -> u32 {
    let fields: Vec<&str> = mem_info.split_whitespace().collect();
    if fields.len() < 3 {
        return 0;
    }

    let (Ok(total), Ok(used)) = (fields[1].parse::<u64>(), fields[2].parse::<u64>()) else {
        return 0;
    };
    if total == 0 {
        return 0;
    }

    (used as f64 / total as f64 * 100.0).round_ties_even() as u32
}

/// Disk usage: the first `N%` in a `df` row, or 0.
pub fn parse_disk_usage(disk_info: &str) -> u32 {
    PERCENT
        .captures(disk_info)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .unwrap_or(0)
}
