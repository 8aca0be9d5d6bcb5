// Snapshot domain models. Field names double as export column names.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One poll cycle's result. Immutable once composed by the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    /// OS-reported utilization since the previous poll, 0-100.
    pub cpu_percent: f64,
    pub memory: MemoryReading,
    /// Keyed by volume device identifier; exactly the mounts whose usage
    /// stat succeeded this poll. The set may grow or shrink across polls.
    pub disks: BTreeMap<String, DiskReading>,
    /// None only when the platform exposes no network counters.
    pub network: Option<NetworkReading>,
    /// Empty when no GPU is available.
    pub gpus: Vec<GpuReading>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryReading {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskReading {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
    pub mountpoint: String,
    pub fstype: String,
    /// Bytes per second, >= 0. Zero for volumes with no resolvable backing device.
    pub read_speed: f64,
    pub write_speed: f64,
}

/// Host-wide cumulative counters plus derived rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkReading {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
    pub send_speed: f64,
    pub recv_speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuReading {
    pub index: u32,
    pub name: String,
    /// 0-100. Fraction-reporting sources are scaled at the probe boundary.
    pub load_percent: f64,
    /// Memory figures in MB, matching the device units GPU tools report.
    pub memory_total: f64,
    pub memory_used: f64,
    pub memory_free: f64,
    pub memory_util_percent: f64,
    /// Degrees Celsius.
    pub temperature: f64,
}
