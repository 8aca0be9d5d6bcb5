// Run parameters and shared constants.

use crate::export::OutputFormat;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;
/// While running, the buffer is re-exported whenever this much time has
/// passed since the last flush.
pub const AUTO_FLUSH_INTERVAL: Duration = Duration::from_secs(60);
/// Default output directory for timestamped export files.
pub const DATA_DIRECTORY: &str = "data";

pub const BYTES_PER_KB: f64 = 1024.0;
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Post-collection sleep between polls. Cadence is interval plus
    /// collection time; drift is not compensated.
    pub interval: Duration,
    /// None runs until cancelled.
    pub duration: Option<Duration>,
    pub output: PathBuf,
    pub format: OutputFormat,
}

impl MonitorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.interval.is_zero(),
            "interval must be > 0, got {:?}",
            self.interval
        );
        if let Some(duration) = self.duration {
            anyhow::ensure!(
                !duration.is_zero(),
                "duration must be > 0, got {:?}",
                duration
            );
        }
        anyhow::ensure!(
            !self.output.as_os_str().is_empty(),
            "output path must be non-empty"
        );
        Ok(())
    }
}
