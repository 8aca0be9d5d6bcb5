// OS metrics provider seam. `SysinfoSource` is the production implementation;
// tests drive the samplers and scheduler through synthetic sources.

mod linux;

use std::collections::HashMap;
use std::time::Instant;

/// One mounted volume as enumerated by the OS.
#[derive(Debug, Clone)]
pub struct PartitionInfo {
    /// Volume device identifier, e.g. `/dev/sda1` or `C:\`.
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
    /// None when statting the mount failed (vanished, permission denied).
    pub usage: Option<VolumeUsage>,
}

#[derive(Debug, Clone, Copy)]
pub struct VolumeUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

/// Cumulative per-physical-device I/O counters.
#[derive(Debug, Clone, Copy)]
pub struct DiskIoCounters {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Cumulative host-wide network counters, aggregated over interfaces.
#[derive(Debug, Clone, Copy)]
pub struct NetIoCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct MemCounters {
    pub total: u64,
    pub available: u64,
}

/// Point-queries against the OS. Each call reflects the state at call time;
/// no setup is required beyond construction.
pub trait MetricsSource {
    /// CPU utilization since the previous call, 0-100.
    fn cpu_percent(&mut self) -> f64;
    fn memory(&mut self) -> MemCounters;
    /// Currently mounted, non-pseudo volumes.
    fn partitions(&mut self) -> Vec<PartitionInfo>;
    /// Keyed by physical device name (`sda`, `PhysicalDrive0`).
    fn disk_io_counters(&mut self) -> HashMap<String, DiskIoCounters>;
    /// None when the platform exposes no network counters.
    fn net_io_counters(&mut self) -> Option<NetIoCounters>;
}

/// Production source backed by the sysinfo crate, with `/proc/diskstats`
/// supplying per-device I/O counters on Linux.
pub struct SysinfoSource {
    sys: sysinfo::System,
    disks: sysinfo::Disks,
    networks: sysinfo::Networks,
    last_cpu: Option<(Instant, f64)>,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut sys = sysinfo::System::new_all();
        sys.refresh_all();
        Self {
            sys,
            disks: sysinfo::Disks::new_with_refreshed_list(),
            networks: sysinfo::Networks::new_with_refreshed_list(),
            last_cpu: None,
        }
    }
}

impl MetricsSource for SysinfoSource {
    fn cpu_percent(&mut self) -> f64 {
        // sysinfo needs a minimum spacing between CPU refreshes; below it,
        // return the cached figure instead of a meaningless re-read.
        let now = Instant::now();
        match self.last_cpu {
            Some((prev_ts, prev_usage))
                if now.duration_since(prev_ts) < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL =>
            {
                prev_usage
            }
            Some(_) => {
                self.sys.refresh_cpu_all();
                let usage = (self.sys.global_cpu_usage() as f64).clamp(0.0, 100.0);
                self.last_cpu = Some((now, usage));
                usage
            }
            None => {
                // First call establishes the baseline; utilization "since
                // previous call" is 0 by definition.
                self.sys.refresh_cpu_all();
                self.last_cpu = Some((now, 0.0));
                0.0
            }
        }
    }

    fn memory(&mut self) -> MemCounters {
        self.sys.refresh_memory();
        MemCounters {
            total: self.sys.total_memory(),
            available: self.sys.available_memory(),
        }
    }

    fn partitions(&mut self) -> Vec<PartitionInfo> {
        self.disks.refresh(true);
        self.disks
            .list()
            .iter()
            .map(|d| {
                let total = d.total_space();
                let free = d.available_space();
                let used = total.saturating_sub(free);
                let percent = if total > 0 {
                    used as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                PartitionInfo {
                    device: d.name().to_string_lossy().into_owned(),
                    mountpoint: d.mount_point().to_string_lossy().into_owned(),
                    fstype: d.file_system().to_string_lossy().into_owned(),
                    usage: Some(VolumeUsage {
                        total,
                        used,
                        free,
                        percent,
                    }),
                }
            })
            .collect()
    }

    fn disk_io_counters(&mut self) -> HashMap<String, DiskIoCounters> {
        linux::read_disk_io_counters()
    }

    fn net_io_counters(&mut self) -> Option<NetIoCounters> {
        self.networks.refresh(true);
        if self.networks.list().is_empty() {
            return None;
        }
        let mut totals = NetIoCounters {
            bytes_sent: 0,
            bytes_recv: 0,
            packets_sent: 0,
            packets_recv: 0,
        };
        for (_, data) in self.networks.list() {
            totals.bytes_sent = totals.bytes_sent.saturating_add(data.total_transmitted());
            totals.bytes_recv = totals.bytes_recv.saturating_add(data.total_received());
            totals.packets_sent = totals
                .packets_sent
                .saturating_add(data.total_packets_transmitted());
            totals.packets_recv = totals
                .packets_recv
                .saturating_add(data.total_packets_received());
        }
        Some(totals)
    }
}
