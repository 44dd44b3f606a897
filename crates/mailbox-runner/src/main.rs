//! `mailboxd`: push a LINE message when the mailbox sensor reports mail.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use mailbox_runner::{run, source, Args, RunnerError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(feature = "prometheus")]
fn init_metrics(args: &Args) -> Result<(), RunnerError> {
    if let Some(addr) = args.metrics_addr {
        mailbox_metrics::install_prometheus(addr).map_err(|e| RunnerError::Metrics(e.to_string()))?;
        info!(%addr, "serving metrics");
    }
    Ok(())
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics(_args: &Args) -> Result<(), RunnerError> {
    Ok(())
}

fn list_ports() -> Result<(), RunnerError> {
    let ports = source::describe_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        println!("{}", port);
    }
    Ok(())
}

fn real_main(args: Args) -> Result<(), RunnerError> {
    if args.list_ports {
        return list_ports();
    }

    init_metrics(&args)?;

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        handler_stop.store(true, Ordering::SeqCst);
    })?;

    info!(dry_run = args.dry_run, "mailboxd starting");
    run(&args, stop)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match real_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
