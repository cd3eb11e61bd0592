use anyhow::{bail, Result};
use clap::Parser;
use std::thread;
use std::time::Duration;
use stracegraph::cli::MonitorCli;
use stracegraph::monitor::{ProcessMonitor, ProcfsTable};
use tracing_subscriber::EnvFilter;

fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = MonitorCli::parse();
    init_tracing(args.debug);

    if args.interval == 0 {
        bail!("Invalid value for --interval: 0 (must be >= 1)");
    }

    let mut monitor = ProcessMonitor::new(ProcfsTable, args.names);
    tracing::info!(names = ?monitor.names(), interval = args.interval, "monitoring processes");

    let mut polls = 0u64;
    loop {
        for (pid, name) in monitor.poll() {
            println!("New PID for {}: {}", name, pid);
        }

        polls += 1;
        if args.max_polls.is_some_and(|max| polls >= max) {
            return Ok(());
        }
        thread::sleep(Duration::from_secs(args.interval));
    }
}
