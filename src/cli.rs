// Command-line surface.

use crate::config::{self, MonitorConfig};
use crate::export::OutputFormat;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "resmon")]
#[command(version, about = "System resource monitor")]
pub struct Cli {
    /// Interval between monitoring snapshots in seconds
    #[arg(short, long, default_value_t = config::DEFAULT_INTERVAL_SECS)]
    pub interval: f64,
    /// Total duration of monitoring in seconds (default: run until cancelled)
    #[arg(short, long)]
    pub duration: Option<f64>,
    /// Output file path to save monitoring data
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Output format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl Cli {
    pub fn into_config(self) -> anyhow::Result<MonitorConfig> {
        anyhow::ensure!(
            self.interval.is_finite() && self.interval > 0.0,
            "interval must be a positive number of seconds, got {}",
            self.interval
        );
        if let Some(duration) = self.duration {
            anyhow::ensure!(
                duration.is_finite() && duration > 0.0,
                "duration must be a positive number of seconds, got {}",
                duration
            );
        }

        // Explicit flag wins; otherwise the output extension decides.
        let format = match (self.format, &self.output) {
            (Some(format), _) => format,
            (None, Some(path)) => OutputFormat::from_path(path),
            (None, None) => OutputFormat::Csv,
        };

        let output = match self.output {
            Some(path) => path,
            None => default_output_path(format)?,
        };

        Ok(MonitorConfig {
            interval: Duration::from_secs_f64(self.interval),
            duration: self.duration.map(Duration::from_secs_f64),
            output,
            format,
        })
    }
}

/// `data/resource-monitor-<timestamp>.<ext>`, creating the directory on demand.
fn default_output_path(format: OutputFormat) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(config::DATA_DIRECTORY)
        .with_context(|| format!("creating data directory {}", config::DATA_DIRECTORY))?;
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    Ok(PathBuf::from(config::DATA_DIRECTORY).join(format!(
        "resource-monitor-{timestamp}.{}",
        format.extension()
    )))
}
