// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring job daemon (recurd)
//!
//! Background process that keeps each stored schedule's instances in line
//! with its cron expression.
//!
//! Architecture:
//! - Timer loop: fires due schedules and runs one reconcile pass each
//! - Checkpoint: periodic snapshot of the store
//! - Signals: SIGHUP reloads the manifest, SIGTERM/SIGINT shut down

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::Path;
use std::time::Duration;

use recur_daemon::lifecycle::{self, Config, LifecycleError};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("recurd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("recurd {}", env!("CARGO_PKG_VERSION"));
                println!("Recurring job daemon - launches job instances on cron schedules");
                println!();
                println!("USAGE:");
                println!("    recurd");
                println!();
                println!("Schedules are read from the TOML manifest named by RECUR_MANIFEST");
                println!("and persisted under RECUR_STATE_DIR. Send SIGHUP to reload the");
                println!("manifest.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: recurd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;

    rotate_log_if_needed(&config.log_path);

    // Write startup marker to log (before tracing setup)
    write_startup_marker(&config)?;

    let log_guard = setup_logging(&config)?;

    info!("Starting recurring job daemon");

    let mut daemon = match lifecycle::startup(&config) {
        Ok(d) => d,
        Err(LifecycleError::LockFailed(_)) => {
            let pid = std::fs::read_to_string(&config.lock_path)
                .unwrap_or_default()
                .trim()
                .to_string();
            eprintln!("recurd is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may not flush in time)
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    info!(
        resync_secs = config.resync_interval.as_secs(),
        "Daemon ready"
    );
    println!("READY");

    // NOTE: Intervals must be created outside the loop - tokio::select!
    // re-evaluates branches on each iteration, so a sleep() inside would
    // reset every time another branch wins.
    let mut timer_check = tokio::time::interval(config.timer_check);
    let mut checkpoint = tokio::time::interval(CHECKPOINT_INTERVAL);
    checkpoint.tick().await;

    loop {
        tokio::select! {
            _ = timer_check.tick() => {
                let ran = daemon.dispatcher.run_due().await;
                if ran > 0 {
                    tracing::trace!(passes = ran, "ran due passes");
                }
            }

            _ = checkpoint.tick() => {
                if let Err(e) = daemon.save_snapshot() {
                    warn!(error = %e, "failed to save checkpoint snapshot");
                }
            }

            _ = sighup.recv() => {
                info!("Received SIGHUP, reloading manifest...");
                if let Err(e) = daemon.reload_manifest() {
                    error!(error = %e, "failed to reload manifest, keeping current schedules");
                }
            }

            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    daemon.shutdown()?;
    info!(
        uptime_secs = daemon.start_time.elapsed().as_secs(),
        "Daemon stopped"
    );
    Ok(())
}

/// Checkpoint interval (60 seconds)
const CHECKPOINT_INTERVAL: Duration = Duration::from_secs(60);

/// Rotate once the log grows past this size.
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rotated logs kept (`daemon.log.1` ..= `daemon.log.N`).
const MAX_ROTATIONS: u32 = 3;

/// Shift `daemon.log` to `daemon.log.1` when it is too large, dropping the
/// oldest rotation.
fn rotate_log_if_needed(log_path: &Path) {
    let Ok(meta) = std::fs::metadata(log_path) else {
        return;
    };
    if meta.len() <= MAX_LOG_SIZE {
        return;
    }

    let rotated = |n: u32| {
        let mut name = log_path.as_os_str().to_owned();
        name.push(format!(".{n}"));
        std::path::PathBuf::from(name)
    };

    let _ = std::fs::remove_file(rotated(MAX_ROTATIONS));
    for n in (1..MAX_ROTATIONS).rev() {
        let from = rotated(n);
        if from.exists() {
            let _ = std::fs::rename(&from, rotated(n + 1));
        }
    }
    let _ = std::fs::rename(log_path, rotated(1));
}

/// Startup marker prefix written to log before anything else.
/// Full format: "--- recurd: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- recurd: starting (pid: ";

/// Write startup marker to log file (appends to existing log)
fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Write startup error synchronously to log file.
fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
