// Linux-specific helpers: /proc/diskstats parsing.

use super::DiskIoCounters;
use std::collections::HashMap;

/// Sector size used by /proc/diskstats regardless of the device's real one.
#[cfg(target_os = "linux")]
const DISKSTATS_SECTOR_SIZE: u64 = 512;

/// Read cumulative per-device read/write byte counters from /proc/diskstats.
/// Non-Linux platforms have no per-device counters here; volumes then report
/// zero throughput while capacity stays populated.
pub(super) fn read_disk_io_counters() -> HashMap<String, DiskIoCounters> {
    #[cfg(target_os = "linux")]
    {
        match std::fs::read_to_string("/proc/diskstats") {
            Ok(content) => parse_diskstats(&content),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read /proc/diskstats");
                HashMap::new()
            }
        }
    }
    #[cfg(not(target_os = "linux"))]
    HashMap::new()
}

/// Fields per line: major minor name reads reads_merged sectors_read ms_reading
/// writes writes_merged sectors_written ...
#[cfg(target_os = "linux")]
fn parse_diskstats(content: &str) -> HashMap<String, DiskIoCounters> {
    let mut counters = HashMap::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 {
            continue;
        }
        let name = fields[2];
        let (Ok(sectors_read), Ok(sectors_written)) =
            (fields[5].parse::<u64>(), fields[9].parse::<u64>())
        else {
            continue;
        };
        counters.insert(
            name.to_string(),
            DiskIoCounters {
                read_bytes: sectors_read.saturating_mul(DISKSTATS_SECTOR_SIZE),
                write_bytes: sectors_written.saturating_mul(DISKSTATS_SECTOR_SIZE),
            },
        );
    }
    counters
}
