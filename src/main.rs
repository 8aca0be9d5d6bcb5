use anyhow::Result;
use clap::Parser;
use resmon::cli::Cli;
use resmon::display::TerminalDisplay;
use resmon::export;
use resmon::samplers::gpu::NvmlProbe;
use resmon::scheduler::SnapshotScheduler;
use resmon::source::SysinfoSource;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config()?;
    config.validate()?;

    let exporter = export::exporter_for(config.format);
    tracing::info!(
        interval_secs = config.interval.as_secs_f64(),
        output = %config.output.display(),
        "starting resource monitoring; press Ctrl+C to stop"
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    let mut scheduler = SnapshotScheduler::new(
        SysinfoSource::new(),
        NvmlProbe::new(),
        config,
        Box::new(TerminalDisplay::new()),
        exporter,
        Instant::now(),
    );
    scheduler.run(shutdown_rx).await
}
