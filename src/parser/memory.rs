//! Process memory readings for the resident-memory guard.

/// Source of the current process's resident memory.
///
/// Substituted in tests to simulate memory pressure.
pub trait MemoryProbe: Send + Sync {
    /// Resident set size in megabytes, or `None` when unavailable.
    fn resident_mb(&self) -> Option<u64>;
}

/// Reads the real process resident set size.
///
/// On Linux this is the `VmRSS` line of `/proc/self/status`, which the kernel
/// reports in kB whatever the page size. Elsewhere no reading is available
/// and the guard never trips.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl MemoryProbe for ProcessMemory {
    fn resident_mb(&self) -> Option<u64> {
        #[cfg(target_os = "linux")]
        {
            let status = std::fs::read_to_string("/proc/self/status").ok()?;
            parse_status_resident_mb(&status)
        }
        #[cfg(not(target_os = "linux"))]
        {
            None
        }
    }
}

/// Fixed reading, for tests and callers with their own accounting.
#[derive(Debug, Clone, Copy)]
pub struct FixedMemory(pub u64);

impl MemoryProbe for FixedMemory {
    fn resident_mb(&self) -> Option<u64> {
        Some(self.0)
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_status_resident_mb(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let mut fields = line["VmRSS:".len()..].split_whitespace();
    let kb: u64 = fields.next()?.parse().ok()?;
    match fields.next() {
        Some("kB") => Some(kb / 1024),
        _ => None,
    }
}
