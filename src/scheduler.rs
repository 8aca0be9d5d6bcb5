// Polling loop: one cooperative task drives collection, display and export
// sequentially. Nothing here suspends except the intentional inter-tick sleep.

use crate::config::{AUTO_FLUSH_INTERVAL, MonitorConfig};
use crate::display::Render;
use crate::export::{ExportError, Exporter};
use crate::models::Snapshot;
use crate::samplers::disk::DiskSampler;
use crate::samplers::gpu::{GpuProbe, GpuSampler};
use crate::samplers::memory;
use crate::samplers::network::NetworkSampler;
use crate::source::MetricsSource;
use anyhow::Context;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

pub struct SnapshotScheduler<S: MetricsSource, P: GpuProbe> {
    source: S,
    disk: DiskSampler,
    network: NetworkSampler,
    gpu: GpuSampler<P>,
    config: MonitorConfig,
    renderer: Box<dyn Render>,
    exporter: Box<dyn Exporter>,
    buffer: Vec<Snapshot>,
    state: SchedulerState,
}

impl<S: MetricsSource, P: GpuProbe> SnapshotScheduler<S, P> {
    /// Enumerates mounts and seeds all rate baselines against `now`, the
    /// reference instant for the session's first rate computations.
    pub fn new(
        mut source: S,
        gpu_probe: P,
        config: MonitorConfig,
        renderer: Box<dyn Render>,
        exporter: Box<dyn Exporter>,
        now: Instant,
    ) -> Self {
        let partitions = source.partitions();
        let io_counters = source.disk_io_counters();
        let disk = DiskSampler::new(&partitions, &io_counters, now);
        let network = NetworkSampler::new(source.net_io_counters(), now);
        let gpu = GpuSampler::new(gpu_probe);
        Self {
            source,
            disk,
            network,
            gpu,
            config,
            renderer,
            exporter,
            buffer: Vec::new(),
            state: SchedulerState::Idle,
        }
    }

    /// One full poll cycle, composed into an immutable snapshot. Every field
    /// is populated before the snapshot is handed to anyone.
    pub fn collect_snapshot(&mut self, now: Instant) -> Snapshot {
        let cpu_percent = self.source.cpu_percent().clamp(0.0, 100.0);
        let memory = memory::collect(self.source.memory());
        let partitions = self.source.partitions();
        let io_counters = self.source.disk_io_counters();
        let disks = self.disk.collect(&partitions, &io_counters, now);
        let network = self
            .source
            .net_io_counters()
            .map(|counters| self.network.collect(counters, now));
        let gpus = self.gpu.collect();
        Snapshot {
            timestamp: chrono::Local::now(),
            cpu_percent,
            memory,
            disks,
            network,
            gpus,
        }
    }

    /// Runs until cancellation or the configured duration elapses, then
    /// performs a final flush of the whole buffer.
    pub async fn run(&mut self, mut shutdown_rx: oneshot::Receiver<()>) -> anyhow::Result<()> {
        self.state = SchedulerState::Running;
        let started = tokio::time::Instant::now();
        let mut last_flush = started;

        loop {
            let snapshot = self.collect_snapshot(Instant::now());
            self.renderer.render(&snapshot);
            self.buffer.push(snapshot);

            if last_flush.elapsed() >= AUTO_FLUSH_INTERVAL {
                match self.flush() {
                    Ok(()) => debug!(snapshots = self.buffer.len(), "auto-flush complete"),
                    // Non-fatal: the buffer is retained, a later flush retries.
                    Err(e) => warn!(error = %e, "auto-flush failed"),
                }
                last_flush = tokio::time::Instant::now();
            }

            if let Some(duration) = self.config.duration
                && started.elapsed() >= duration
            {
                info!("configured duration reached");
                break;
            }

            // Pure post-collection sleep: cadence is interval plus collection
            // time, uncompensated. Cancellation wakes the sleep early.
            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                result = &mut shutdown_rx => {
                    match result {
                        Ok(()) => info!("monitoring stopped by operator"),
                        Err(_) => debug!("cancellation channel closed; stopping"),
                    }
                    break;
                }
            }
        }

        self.state = SchedulerState::Stopped;
        self.flush().context("final flush")?;
        info!(
            snapshots = self.buffer.len(),
            output = %self.config.output.display(),
            "monitoring data saved"
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ExportError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        // Each flush rewrites the whole file, so earlier partial exports are
        // superseded rather than appended to.
        self.exporter.export(&self.buffer, &self.config.output)
    }

    pub fn buffer(&self) -> &[Snapshot] {
        &self.buffer
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }
}
