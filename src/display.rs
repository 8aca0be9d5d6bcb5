// Terminal renderer: redraws each snapshot in place by moving the cursor up
// over the previous render.

use crate::config::{BYTES_PER_GB, BYTES_PER_KB, BYTES_PER_MB};
use crate::models::Snapshot;
use std::io::Write;

/// Display collaborator. Receives one fully-composed snapshot per tick.
pub trait Render {
    fn render(&mut self, snapshot: &Snapshot);
}

pub struct TerminalDisplay<W: Write = std::io::Stdout> {
    out: W,
    last_line_count: usize,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            last_line_count: 0,
        }
    }
}

impl<W: Write> Render for TerminalDisplay<W> {
    fn render(&mut self, snapshot: &Snapshot) {
        let lines = format_snapshot_lines(snapshot);
        // Cursor up + clear line, once per previously printed line. The
        // trailing writeln leaves the cursor on the line right after the
        // block, so the count is exactly lines.len().
        for _ in 0..self.last_line_count {
            let _ = write!(self.out, "\x1b[F\x1b[K");
        }
        let _ = writeln!(self.out, "{}", lines.join("\n"));
        let _ = self.out.flush();
        self.last_line_count = lines.len();
    }
}

pub fn format_snapshot_lines(snapshot: &Snapshot) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Timestamp: {}",
            snapshot.timestamp.format("%Y-%m-%d %H:%M:%S")
        ),
        format!("CPU Usage: {:.1}%", snapshot.cpu_percent),
        format!(
            "Memory Used: {:.2} GB ({:.1}%)",
            snapshot.memory.used as f64 / BYTES_PER_GB,
            snapshot.memory.percent
        ),
    ];

    if let Some(net) = &snapshot.network {
        lines.push(format!(
            "Network: Send: {}, Recv: {}",
            format_speed(net.send_speed),
            format_speed(net.recv_speed)
        ));
    }

    lines.push(String::new());
    lines.push("Disk Usage:".into());
    for (device, disk) in &snapshot.disks {
        lines.push(format!("{device} ({}, {}):", disk.mountpoint, disk.fstype));
        lines.push(format!(
            "  Usage: {:.2} GB / {:.2} GB ({:.1}%)",
            disk.used as f64 / BYTES_PER_GB,
            disk.total as f64 / BYTES_PER_GB,
            disk.percent
        ));
        lines.push(format!(
            "  I/O: Read: {}, Write: {}",
            format_speed(disk.read_speed),
            format_speed(disk.write_speed)
        ));
        lines.push(String::new());
    }

    if !snapshot.gpus.is_empty() {
        lines.push("GPUs:".into());
        for gpu in &snapshot.gpus {
            lines.push(format!("  GPU {} ({}):", gpu.index, gpu.name));
            lines.push(format!("    Load: {:.0}%", gpu.load_percent));
            lines.push(format!(
                "    Memory Used: {:.0} MB / {:.0} MB ({:.0}%)",
                gpu.memory_used, gpu.memory_total, gpu.memory_util_percent
            ));
            lines.push(format!("    Temperature: {:.0}\u{b0}C", gpu.temperature));
        }
    }

    lines
}

pub fn format_speed(bytes_per_sec: f64) -> String {
    if bytes_per_sec >= BYTES_PER_GB {
        format!("{:.2} GB/s", bytes_per_sec / BYTES_PER_GB)
    } else if bytes_per_sec >= BYTES_PER_MB {
        format!("{:.2} MB/s", bytes_per_sec / BYTES_PER_MB)
    } else if bytes_per_sec >= BYTES_PER_KB {
        format!("{:.2} KB/s", bytes_per_sec / BYTES_PER_KB)
    } else {
        format!("{bytes_per_sec:.2} B/s")
    }
}
