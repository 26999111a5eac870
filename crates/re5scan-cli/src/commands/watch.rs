//! Poll loop: one JSON snapshot per line on stdout.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use re5scan_core::{Monitor, MonitorConfig, SystemLocator, TracingReporter};
use tracing::info;

use crate::shutdown::ShutdownSignal;

/// Run the watch loop until Ctrl+C
pub fn run(config: MonitorConfig) -> Result<()> {
    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        shutdown_ctrlc.trigger();
    })?;

    info!("re5scan {}", env!("CARGO_PKG_VERSION"));
    let poll_interval = config.poll_interval();
    let mut monitor = Monitor::new(SystemLocator, config, TracingReporter);
    monitor.startup()?;

    if !monitor.is_game_running() {
        info!(
            "Waiting for {}... (Ctrl+C to quit)",
            monitor.config().process_name
        );
    }

    let stdout = io::stdout();
    while !shutdown.is_shutdown() {
        if let Some(snapshot) = monitor.pull_data() {
            let mut out = stdout.lock();
            serde_json::to_writer(&mut out, &snapshot)?;
            writeln!(out)?;
            out.flush()?;
        }

        if shutdown.wait(poll_interval) {
            break;
        }
    }

    monitor.shutdown();
    info!("Stopped");
    Ok(())
}
