// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `probe-align`: register a scan report into one frame and print the metrics.
//!
//! Settings are layered: built-in defaults, then `registration.json` from the
//! config directory, then command-line flags. The process exits non-zero on
//! unreadable input, invalid configuration or an inconsistent overlap.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod render;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use probe_align::{parse_scan_report, RegistrationConfig, Registrar, ScannerId};
use probe_config::{ConfigService, FsConfigStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use render::{render, Format};

#[derive(Parser, Debug)]
#[command(author, version, about = "Register overlapping 3D scans into one frame")]
struct Args {
    /// Scan report to read (`--- scanner N ---` blocks of `x,y,z` lines)
    #[arg(long, short)]
    input: PathBuf,
    /// Points two scanners must share to count as overlapping
    #[arg(long)]
    min_shared_points: Option<usize>,
    /// Scanner whose frame becomes the global frame
    #[arg(long)]
    root: Option<ScannerId>,
    /// Worker threads for detection and matching
    #[arg(long)]
    workers: Option<usize>,
    /// Check only the first two correspondences of each overlap
    #[arg(long)]
    no_revalidate: bool,
    /// Directory holding `registration.json` (defaults to the platform config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Output encoding
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Write the report here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Omit elapsed time from the text report
    #[arg(long)]
    no_time: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<RegistrationConfig> {
    let stored = match &args.config_dir {
        Some(dir) => {
            let store = FsConfigStore::at(dir)
                .with_context(|| format!("opening config dir {}", dir.display()))?;
            ConfigService::new(store).load_registration()?
        }
        None => match FsConfigStore::new() {
            Ok(store) => ConfigService::new(store).load_registration()?,
            Err(err) => {
                warn!(%err, "no config directory; using defaults");
                RegistrationConfig::default()
            }
        },
    };

    let mut cfg = stored;
    if let Some(n) = args.min_shared_points {
        cfg = cfg.with_min_shared_points(n);
    }
    if let Some(root) = args.root {
        cfg = cfg.with_root(root);
    }
    if let Some(workers) = args.workers {
        cfg = cfg.with_workers(workers);
    }
    if args.no_revalidate {
        cfg = cfg.with_revalidate_all(false);
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let cfg = load_config(&args).context("loading registration config")?;
    let registrar = Registrar::new(cfg)?;
    info!(config = ?registrar.config(), "starting");

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let scanners = parse_scan_report(&text)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let started = Instant::now();
    let registration = registrar.register(scanners)?;
    let elapsed = (!args.no_time).then(|| started.elapsed());

    let report = render(&registration, args.format, elapsed)?;
    match &args.output {
        Some(path) => std::fs::write(path, report)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{report}"),
    }
    Ok(())
}
