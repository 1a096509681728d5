// Rust guideline compliant 2026-02-06

//! Memory reserve and peak memory probing.

use tracing::{debug, warn};

/// A block of memory reserved up front and given back when an allocation
/// fails, so that the construction can still shut down cleanly.
#[derive(Debug, Default)]
pub struct MemoryPadding {
    reserve: Vec<u8>,
}

impl MemoryPadding {
    /// Reserves `megabytes` MiB. The pages are written once so that they
    /// are backed by physical memory even under overcommit. A failed
    /// reservation leaves the padding empty and is only logged.
    pub fn new(megabytes: usize) -> Self {
        let mut reserve = Vec::new();
        let bytes = megabytes.saturating_mul(1024 * 1024);
        if reserve.try_reserve_exact(bytes).is_err() {
            warn!("Could not reserve {} MiB of memory padding", megabytes);
        } else {
            reserve.resize(bytes, 0);
            debug!("Reserved {} MiB of memory padding", megabytes);
        }
        Self { reserve }
    }

    /// Whether memory is still held.
    pub fn is_reserved(&self) -> bool {
        !self.reserve.is_empty()
    }

    /// Number of bytes held.
    pub fn held_bytes(&self) -> usize {
        self.reserve.len()
    }

    /// Gives the reserved memory back to the allocator.
    pub fn release(&mut self) {
        if self.is_reserved() {
            debug!("Releasing memory padding");
            self.reserve = Vec::new();
        }
    }
}

/// Peak virtual memory of this process in KiB, if the platform reports it.
pub fn peak_memory_kb() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_peak_memory(&status)
}

fn parse_peak_memory(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmPeak:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
}
