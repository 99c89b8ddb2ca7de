//! CPU, memory and storage utilisation.

use serde::Serialize;

use super::{commands, probe};
use crate::parse::{parse_cpu_usage, parse_disk_usage, parse_memory_usage};
use crate::session::Session;

/// Utilisation percentages. A metric whose probe failed reads 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SystemStats {
    pub cpu: u32,
    pub memory: u32,
    pub storage: u32,
}

/// Collect all three metrics; always returns a complete set.
pub async fn stats(session: &Session) -> SystemStats {
    let (cpu, memory, storage) = tokio::join!(
        probe(session, commands::CPU),
        probe(session, commands::MEMORY),
        probe(session, commands::DISK),
    );

    SystemStats {
        cpu: cpu.as_deref().map(parse_cpu_usage).unwrap_or(0),
        memory: memory.as_deref().map(parse_memory_usage).unwrap_or(0),
        storage: storage.as_deref().map(parse_disk_usage).unwrap_or(0),
    }
}
