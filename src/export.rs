// Snapshot buffer -> CSV/JSON files.
//
// CSV flattens the nested disk and GPU readings into composite columns
// (`disk_<device>_<metric>`, `gpu<index>_<field>`); JSON keeps the nested
// structure. The CSV header is derived from the first snapshot, so if the
// mount set changes mid-run, later rows write empty cells for vanished
// devices and drop columns for new ones. Known limitation of row formats.

use crate::models::Snapshot;
use clap::ValueEnum;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DISK_METRICS: [&str; 6] = ["total", "used", "free", "percent", "read_speed", "write_speed"];
const GPU_FIELDS: [&str; 8] = [
    "index",
    "name",
    "load_percent",
    "memory_total",
    "memory_used",
    "memory_free",
    "memory_util_percent",
    "temperature",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Infer the format from the output path extension; anything but
    /// `.json` is treated as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Storage collaborator. Receives the full ordered snapshot sequence; each
/// flush rewrites the destination, so a failed flush can be retried later
/// with nothing lost.
pub trait Exporter {
    fn export(&mut self, snapshots: &[Snapshot], path: &Path) -> Result<(), ExportError>;
}

pub fn exporter_for(format: OutputFormat) -> Box<dyn Exporter> {
    match format {
        OutputFormat::Csv => Box::new(CsvExporter),
        OutputFormat::Json => Box::new(JsonExporter),
    }
}

pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export(&mut self, snapshots: &[Snapshot], path: &Path) -> Result<(), ExportError> {
        let file = std::fs::File::create(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(file, snapshots)?;
        Ok(())
    }
}

pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn export(&mut self, snapshots: &[Snapshot], path: &Path) -> Result<(), ExportError> {
        let Some(first) = snapshots.first() else {
            return Ok(());
        };

        let header = csv_header(first);
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&header)?;
        for snapshot in snapshots {
            let cells = flatten_row(snapshot);
            writer.write_record(
                header
                    .iter()
                    .map(|column| cells.get(column).map(String::as_str).unwrap_or("")),
            )?;
        }
        writer.flush().map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

/// Column layout: fixed scalar columns, then sorted disk columns, then GPU
/// columns for however many GPUs the first snapshot saw.
fn csv_header(first: &Snapshot) -> Vec<String> {
    let mut header: Vec<String> = [
        "timestamp",
        "cpu_percent",
        "memory_total",
        "memory_available",
        "memory_used",
        "memory_percent",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    let mut disk_columns: Vec<String> = first
        .disks
        .keys()
        .flat_map(|device| {
            let device = column_safe(device);
            DISK_METRICS
                .iter()
                .map(move |metric| format!("disk_{device}_{metric}"))
        })
        .collect();
    disk_columns.sort_unstable();
    header.extend(disk_columns);

    for i in 0..first.gpus.len() {
        header.extend(GPU_FIELDS.iter().map(|field| format!("gpu{i}_{field}")));
    }

    header
}

fn flatten_row(snapshot: &Snapshot) -> HashMap<String, String> {
    let mut cells = HashMap::new();
    cells.insert("timestamp".into(), snapshot.timestamp.to_rfc3339());
    cells.insert("cpu_percent".into(), snapshot.cpu_percent.to_string());
    cells.insert("memory_total".into(), snapshot.memory.total.to_string());
    cells.insert(
        "memory_available".into(),
        snapshot.memory.available.to_string(),
    );
    cells.insert("memory_used".into(), snapshot.memory.used.to_string());
    cells.insert("memory_percent".into(), snapshot.memory.percent.to_string());

    for (device, disk) in &snapshot.disks {
        let device = column_safe(device);
        cells.insert(format!("disk_{device}_total"), disk.total.to_string());
        cells.insert(format!("disk_{device}_used"), disk.used.to_string());
        cells.insert(format!("disk_{device}_free"), disk.free.to_string());
        cells.insert(format!("disk_{device}_percent"), disk.percent.to_string());
        cells.insert(
            format!("disk_{device}_read_speed"),
            disk.read_speed.to_string(),
        );
        cells.insert(
            format!("disk_{device}_write_speed"),
            disk.write_speed.to_string(),
        );
    }

    for (i, gpu) in snapshot.gpus.iter().enumerate() {
        cells.insert(format!("gpu{i}_index"), gpu.index.to_string());
        cells.insert(format!("gpu{i}_name"), gpu.name.clone());
        cells.insert(format!("gpu{i}_load_percent"), gpu.load_percent.to_string());
        cells.insert(format!("gpu{i}_memory_total"), gpu.memory_total.to_string());
        cells.insert(format!("gpu{i}_memory_used"), gpu.memory_used.to_string());
        cells.insert(format!("gpu{i}_memory_free"), gpu.memory_free.to_string());
        cells.insert(
            format!("gpu{i}_memory_util_percent"),
            gpu.memory_util_percent.to_string(),
        );
        cells.insert(format!("gpu{i}_temperature"), gpu.temperature.to_string());
    }

    cells
}

/// Strip drive-letter colons from device names used in column headers.
fn column_safe(device: &str) -> String {
    device.replace(':', "")
}
