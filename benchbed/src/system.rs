//! Host description recorded with every run.

use benchbed_core::SystemInfo;
use chrono::Local;
use log::debug;

const MEMINFO_PATH: &str = "/proc/meminfo";

/// Describe the machine the run is happening on.
///
/// Keys, in order: `timestamp`, `os`, `arch`, `benchbed_version`,
/// `cpu_count`, then `total_memory` and `available_memory` (bytes) where
/// `/proc/meminfo` is readable.
pub fn collect_system_info() -> SystemInfo {
    let cpu_count = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    let mut info = SystemInfo::new()
        .with("timestamp", Local::now().to_rfc3339())
        .with("os", std::env::consts::OS)
        .with("arch", std::env::consts::ARCH)
        .with("benchbed_version", env!("CARGO_PKG_VERSION"))
        .with("cpu_count", cpu_count);

    match std::fs::read_to_string(MEMINFO_PATH) {
        Ok(content) => {
            let memory = parse_meminfo(&content);
            if let Some(total) = memory.total {
                info.insert("total_memory", total);
            }
            if let Some(available) = memory.available {
                info.insert("available_memory", available);
            }
        }
        Err(e) => debug!("Memory information unavailable: {}", e),
    }

    info
}

/// Memory figures in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total: Option<u64>,
    pub available: Option<u64>,
}

/// Parse the `MemTotal` and `MemAvailable` lines of `/proc/meminfo`.
pub fn parse_meminfo(content: &str) -> MemoryInfo {
    let mut memory = MemoryInfo::default();
    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let slot = match key.trim() {
            "MemTotal" => &mut memory.total,
            "MemAvailable" => &mut memory.available,
            _ => continue,
        };
        *slot = parse_kib(rest);
    }
    memory
}

fn parse_kib(value: &str) -> Option<u64> {
    let mut parts = value.split_whitespace();
    let amount: u64 = parts.next()?.parse().ok()?;
    match parts.next() {
        Some("kB") | None => amount.checked_mul(1024),
        Some(_) => None,
    }
}
