//! SizeWalk: live disk usage browser.
//!
//! Thin binary entry point. All logic lives in the `sizewalk-core`
//! and `sizewalk-gui` crates.

use clap::Parser;
use sizewalk_core::model::ByteFormat;
use sizewalk_core::{RootError, ScanOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Browse a directory tree by size while it is still being measured.
#[derive(Parser, Debug)]
#[command(name = "sizewalk", version, about)]
struct Cli {
    /// Directory to measure.
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// How sizes are shown: bytes, iec (KiB, MiB, ...) or si (kB, MB, ...).
    #[arg(short, long, default_value_t = ByteFormat::Iec)]
    format: ByteFormat,

    /// Do not show the "Ready" notice when the walk completes.
    #[arg(long)]
    no_ready_notice: bool,

    /// Worker threads for the walk (defaults to the number of CPUs).
    #[arg(short, long, value_name = "N")]
    threads: Option<usize>,

    /// Log at debug level (per-entry read errors included).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    tracing::info!("SizeWalk starting");

    let mut scan_options = ScanOptions::default();
    if let Some(threads) = cli.threads {
        scan_options.threads = threads;
    }

    // Start the walk before opening the window so a bad root is reported
    // here, with usage, instead of in an empty window.
    let state = match sizewalk_gui::SizeWalkState::build(
        &cli.path,
        &scan_options,
        cli.format,
        !cli.no_ready_notice,
    ) {
        Ok(state) => state,
        Err(err) if err.downcast_ref::<RootError>().is_some() => {
            eprintln!("Error: {err}");
            eprintln!();
            eprintln!("Usage: sizewalk [OPTIONS] [PATH]");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err),
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("SizeWalk")
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SizeWalk",
        options,
        Box::new(|cc| Ok(Box::new(sizewalk_gui::SizeWalkApp::with_state(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(ExitCode::SUCCESS)
}
