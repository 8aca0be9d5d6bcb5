// GPU sampling with a sticky capability flag: once enumeration fails or
// comes back empty, GPU monitoring stays off for the rest of the process
// instead of re-probing every tick.

use crate::config::BYTES_PER_MB;
use crate::models::GpuReading;
use nvml_wrapper::Nvml;
use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
use tracing::{info, warn};

/// GPU metrics provider. Implementations must return utilization and memory
/// utilization as 0-100 percentages; sources reporting 0-1 fractions scale
/// them here, at the boundary.
pub trait GpuProbe {
    fn list(&mut self) -> anyhow::Result<Vec<GpuReading>>;
}

pub struct GpuSampler<P> {
    probe: P,
    available: bool,
}

impl<P: GpuProbe> GpuSampler<P> {
    /// Probes availability once at construction.
    pub fn new(mut probe: P) -> Self {
        let available = match probe.list() {
            Ok(_) => true,
            Err(e) => {
                info!(error = %e, "no GPU detected - GPU monitoring disabled");
                false
            }
        };
        Self { probe, available }
    }

    pub fn collect(&mut self) -> Vec<GpuReading> {
        if !self.available {
            return Vec::new();
        }
        match self.probe.list() {
            Ok(gpus) if !gpus.is_empty() => gpus,
            Ok(_) => {
                info!("GPU enumeration returned no devices - GPU monitoring disabled");
                self.available = false;
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "GPU query failed - GPU monitoring disabled");
                self.available = false;
                Vec::new()
            }
        }
    }

    pub fn available(&self) -> bool {
        self.available
    }
}

/// NVML-backed probe. Initializes the library lazily on first use.
#[derive(Default)]
pub struct NvmlProbe {
    nvml: Option<Nvml>,
}

impl NvmlProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GpuProbe for NvmlProbe {
    fn list(&mut self) -> anyhow::Result<Vec<GpuReading>> {
        let nvml = match self.nvml.take() {
            Some(nvml) => self.nvml.insert(nvml),
            None => self.nvml.insert(Nvml::init()?),
        };

        let count = nvml.device_count()?;
        let mut gpus = Vec::with_capacity(count as usize);
        for index in 0..count {
            let device = nvml.device_by_index(index)?;
            let memory = device.memory_info()?;
            // NVML reports utilization in percent and memory in bytes.
            let utilization = device.utilization_rates()?;
            let memory_util_percent = if memory.total > 0 {
                memory.used as f64 / memory.total as f64 * 100.0
            } else {
                0.0
            };
            gpus.push(GpuReading {
                index,
                name: device.name()?,
                load_percent: utilization.gpu as f64,
                memory_total: memory.total as f64 / BYTES_PER_MB,
                memory_used: memory.used as f64 / BYTES_PER_MB,
                memory_free: memory.free as f64 / BYTES_PER_MB,
                memory_util_percent,
                temperature: device.temperature(TemperatureSensor::Gpu)? as f64,
            });
        }
        Ok(gpus)
    }
}
