// Shared test helpers: synthetic collaborators for the scheduler and samplers.
#![allow(dead_code)]

use resmon::config::MonitorConfig;
use resmon::display::Render;
use resmon::export::{ExportError, Exporter, OutputFormat};
use resmon::models::{GpuReading, Snapshot};
use resmon::samplers::gpu::GpuProbe;
use resmon::source::{
    DiskIoCounters, MemCounters, MetricsSource, NetIoCounters, PartitionInfo, VolumeUsage,
};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mutable synthetic OS state; tests keep a handle and edit it between polls.
#[derive(Clone)]
pub struct FakeState {
    pub cpu: f64,
    pub mem: MemCounters,
    pub partitions: Vec<PartitionInfo>,
    pub io: HashMap<String, DiskIoCounters>,
    pub net: Option<NetIoCounters>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            cpu: 42.5,
            mem: MemCounters {
                total: 16 * 1024 * 1024 * 1024,
                available: 8 * 1024 * 1024 * 1024,
            },
            partitions: vec![partition("/dev/sda1", "/", "ext4")],
            io: HashMap::from([(
                "sda".to_string(),
                DiskIoCounters {
                    read_bytes: 0,
                    write_bytes: 0,
                },
            )]),
            net: Some(NetIoCounters {
                bytes_sent: 1000,
                bytes_recv: 5000,
                packets_sent: 10,
                packets_recv: 50,
            }),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeSource(pub Arc<Mutex<FakeState>>);

impl FakeSource {
    pub fn new(state: FakeState) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    pub fn set_net_bytes(&self, sent: u64, recv: u64) {
        let mut state = self.0.lock().unwrap();
        let net = state.net.as_mut().unwrap();
        net.bytes_sent = sent;
        net.bytes_recv = recv;
    }
}

impl MetricsSource for FakeSource {
    fn cpu_percent(&mut self) -> f64 {
        self.0.lock().unwrap().cpu
    }

    fn memory(&mut self) -> MemCounters {
        self.0.lock().unwrap().mem
    }

    fn partitions(&mut self) -> Vec<PartitionInfo> {
        self.0.lock().unwrap().partitions.clone()
    }

    fn disk_io_counters(&mut self) -> HashMap<String, DiskIoCounters> {
        self.0.lock().unwrap().io.clone()
    }

    fn net_io_counters(&mut self) -> Option<NetIoCounters> {
        self.0.lock().unwrap().net
    }
}

pub fn partition(device: &str, mountpoint: &str, fstype: &str) -> PartitionInfo {
    PartitionInfo {
        device: device.to_string(),
        mountpoint: mountpoint.to_string(),
        fstype: fstype.to_string(),
        usage: Some(VolumeUsage {
            total: 100_000_000_000,
            used: 40_000_000_000,
            free: 60_000_000_000,
            percent: 40.0,
        }),
    }
}

pub fn gpu_reading(index: u32) -> GpuReading {
    GpuReading {
        index,
        name: format!("Fake GPU {index}"),
        load_percent: 25.0,
        memory_total: 8192.0,
        memory_used: 1024.0,
        memory_free: 7168.0,
        memory_util_percent: 12.5,
        temperature: 55.0,
    }
}

/// Scripted GPU probe with call-count instrumentation. Once the script is
/// exhausted, further calls return an empty device list.
#[derive(Clone, Default)]
pub struct FakeProbe {
    pub calls: Arc<AtomicUsize>,
    pub script: Arc<Mutex<VecDeque<Result<Vec<GpuReading>, String>>>>,
}

impl FakeProbe {
    pub fn scripted(script: Vec<Result<Vec<GpuReading>, String>>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(Mutex::new(script.into())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl GpuProbe for FakeProbe {
    fn list(&mut self) -> anyhow::Result<Vec<GpuReading>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(gpus)) => Ok(gpus),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(Vec::new()),
        }
    }
}

pub struct NullRender;

impl Render for NullRender {
    fn render(&mut self, _snapshot: &Snapshot) {}
}

/// Exporter that records flush attempts instead of touching the filesystem.
#[derive(Clone, Default)]
pub struct CountingExporter {
    pub flushes: Arc<AtomicUsize>,
    pub last_len: Arc<AtomicUsize>,
    pub fail: bool,
}

impl CountingExporter {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::Relaxed)
    }
}

impl Exporter for CountingExporter {
    fn export(&mut self, snapshots: &[Snapshot], path: &Path) -> Result<(), ExportError> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.last_len.store(snapshots.len(), Ordering::Relaxed);
        if self.fail {
            return Err(ExportError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::other("synthetic export failure"),
            });
        }
        Ok(())
    }
}

pub fn test_config(interval: Duration, duration: Option<Duration>) -> MonitorConfig {
    MonitorConfig {
        interval,
        duration,
        output: PathBuf::from("unused.csv"),
        format: OutputFormat::Csv,
    }
}
