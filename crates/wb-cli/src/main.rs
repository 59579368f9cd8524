//! CLI entry point for the watchbridge facade.
//!
//! Watches directories through whichever era of the underlying service is
//! in effect and prints every change set until interrupted.
//!
//! # Usage
//!
//! ```bash
//! # Watch the current directory
//! watchbridge
//!
//! # Watch specific directories with forced polling
//! watchbridge lib spec --force-polling
//!
//! # Pin the backend version (era) explicitly
//! watchbridge --backend-version 2.7.11 lib
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use camino::Utf8PathBuf;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wb_core::{ChangeSet, CompatConfig, WatchOptions, WatchRequest, shared_handler};
use wb_facade::{ChangeListener, Interrupt, create};

/// Watch directories for changes across every backend era.
#[derive(Parser)]
#[command(name = "watchbridge", version, about, long_about = None)]
struct Cli {
    /// Directories to watch.
    #[arg(default_value = ".")]
    directories: Vec<Utf8PathBuf>,

    /// Force the polling adapter instead of native OS watching.
    #[arg(long)]
    force_polling: bool,

    /// Backend version to assume instead of detecting one.
    #[arg(long, env = "WB_BACKEND_VERSION")]
    backend_version: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},notify=warn,mio=warn"))
    });

    // Colors off when asked by flag or by the NO_COLOR convention.
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

fn print_change_set(set: &ChangeSet) {
    for path in &set.added {
        println!("added     {path}");
    }
    for path in &set.modified {
        println!("modified  {path}");
    }
    for path in &set.removed {
        println!("removed   {path}");
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let config = CompatConfig {
        version_override: cli.backend_version.clone(),
    };
    let mut facade = create(&config)?;
    info!(era = ?facade.era(), directories = ?cli.directories, "starting watch");

    let request = WatchRequest::new(
        cli.directories,
        WatchOptions {
            force_polling: cli.force_polling,
        },
    )?;

    let interrupt = Interrupt::new();
    spawn_signal_listener(interrupt.clone());

    // The facade blocks until the interrupt token fires, so it runs on the
    // blocking pool while this task waits for it.
    let token = interrupt.clone();
    let worker = tokio::task::spawn_blocking(move || {
        facade.listen(&request, shared_handler(print_change_set), &token)
    });
    worker.await??;

    info!("watch stopped");
    Ok(())
}

/// Fires the interrupt token on Ctrl-C (and SIGTERM on Unix).
fn spawn_signal_listener(interrupt: Interrupt) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut term = match signal(SignalKind::terminate()) {
                Ok(term) => term,
                Err(error) => {
                    tracing::warn!(%error, "failed to install SIGTERM handler");
                    let _ = tokio::signal::ctrl_c().await;
                    interrupt.fire();
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        info!("interrupt received, shutting down");
        interrupt.fire();
    });
}
