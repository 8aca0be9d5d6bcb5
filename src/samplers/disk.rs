// Disk capacity and throughput per mounted volume.
//
// The volume -> physical-device map is built once at construction; disk
// layout is treated as stable for the monitoring session. Volumes with no
// resolvable backing device keep valid capacity fields and report zero
// throughput.

use crate::models::DiskReading;
use crate::rate::RateTracker;
use crate::source::{DiskIoCounters, PartitionInfo};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, warn};

pub struct DiskSampler {
    device_map: HashMap<String, String>,
    rates: RateTracker,
}

impl DiskSampler {
    /// Builds the device map from the initial mount enumeration and the set
    /// of available I/O counter keys, seeding a rate baseline for every
    /// mapped device so the first poll already has a reference point.
    pub fn new(
        partitions: &[PartitionInfo],
        io_counters: &HashMap<String, DiskIoCounters>,
        now: Instant,
    ) -> Self {
        let mut device_map = HashMap::new();
        let mut claimed = HashSet::new();
        let mut rates = RateTracker::new();

        for partition in partitions {
            match resolve_physical_device(&partition.device, io_counters, &claimed) {
                Some(key) => {
                    if let Some(counters) = io_counters.get(&key) {
                        rates.update(&read_key(&partition.device), counters.read_bytes, now);
                        rates.update(&write_key(&partition.device), counters.write_bytes, now);
                    }
                    claimed.insert(key.clone());
                    device_map.insert(partition.device.clone(), key);
                }
                None => {
                    debug!(
                        device = %partition.device,
                        mountpoint = %partition.mountpoint,
                        "no backing device counters; volume will report zero throughput"
                    );
                }
            }
        }

        Self { device_map, rates }
    }

    /// One entry per currently visible mount whose usage stat succeeded.
    pub fn collect(
        &mut self,
        partitions: &[PartitionInfo],
        io_counters: &HashMap<String, DiskIoCounters>,
        now: Instant,
    ) -> BTreeMap<String, DiskReading> {
        let mut readings = BTreeMap::new();

        for partition in partitions {
            let Some(usage) = partition.usage else {
                warn!(
                    device = %partition.device,
                    mountpoint = %partition.mountpoint,
                    "volume usage unavailable; skipping this poll"
                );
                continue;
            };

            let (read_speed, write_speed) = match self
                .device_map
                .get(&partition.device)
                .and_then(|key| io_counters.get(key))
            {
                Some(counters) => (
                    self.rates
                        .update(&read_key(&partition.device), counters.read_bytes, now),
                    self.rates
                        .update(&write_key(&partition.device), counters.write_bytes, now),
                ),
                None => (0.0, 0.0),
            };

            readings.insert(
                partition.device.clone(),
                DiskReading {
                    total: usage.total,
                    used: usage.used,
                    free: usage.free,
                    percent: usage.percent,
                    mountpoint: partition.mountpoint.clone(),
                    fstype: partition.fstype.clone(),
                    read_speed,
                    write_speed,
                },
            );
        }

        readings
    }

    /// The counter key a volume was bound to, if any.
    pub fn mapped_device(&self, device: &str) -> Option<&str> {
        self.device_map.get(device).map(String::as_str)
    }
}

fn read_key(device: &str) -> String {
    format!("{device}:read")
}

fn write_key(device: &str) -> String {
    format!("{device}:write")
}

/// Resolve a volume's backing physical-device counter key, dispatching on
/// the platform family. `claimed` holds keys already bound to other mounts.
fn resolve_physical_device(
    device: &str,
    io_counters: &HashMap<String, DiskIoCounters>,
    claimed: &HashSet<String>,
) -> Option<String> {
    if cfg!(windows) {
        windows_physical_drive(io_counters.keys().map(String::as_str), claimed)
    } else {
        unix_base_device(device, |key| io_counters.contains_key(key))
    }
}

/// Unix family: strip trailing partition digits and the path prefix from the
/// device path (`/dev/sda1` -> `sda`), then look that name up directly.
pub fn unix_base_device(device: &str, has_key: impl Fn(&str) -> bool) -> Option<String> {
    let base = device.trim_end_matches(|c: char| c.is_ascii_digit());
    let name = base.rsplit('/').next().unwrap_or(base);
    if !name.is_empty() && has_key(name) {
        Some(name.to_string())
    } else {
        None
    }
}

/// Windows family: physical drive indices are independent of partition
/// letters, so bind the first unclaimed PhysicalDrive key. Approximate but
/// acceptable for a session-stable disk layout.
pub fn windows_physical_drive<'a>(
    keys: impl Iterator<Item = &'a str>,
    claimed: &HashSet<String>,
) -> Option<String> {
    let mut candidates: Vec<&str> = keys
        .filter(|k| k.starts_with("PhysicalDrive") && !claimed.contains(*k))
        .collect();
    candidates.sort_unstable();
    candidates.first().map(|k| k.to_string())
}
