//! Cache Hierarchy Simulator CLI.
//!
//! Builds a cache hierarchy from command-line parameters or a TOML file,
//! replays a memory access trace through it and prints per-level
//! statistics.
//!
//! # Usage
//!
//! ```text
//! cachesim -I 4096:1:2:R -D 1:4096:2:4:R:B:A -D 2:16384:4:8:L:T:N trace.txt
//! cachesim --config caches.toml trace.txt
//! ```

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

extern crate cachesim;

use cachesim::config::{CacheHierarchyConfig, Config, GeneralConfig};
use cachesim::core::Hierarchy;
use cachesim::{sim, stats};

/// Command-line arguments for the cache simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "CPU Cache Hierarchy Simulator")]
struct Args {
    /// I-cache parameters: blocks:words:assoc:R|L
    #[arg(short = 'I', long = "icache", value_name = "SPEC")]
    icache: Option<String>,

    /// D-cache parameters: level:blocks:words:assoc:R|L:B|T:A|N
    #[arg(short = 'D', long = "dcache", value_name = "SPEC")]
    dcache: Vec<String>,

    /// TOML configuration file, used instead of -I/-D.
    #[arg(short, long, conflicts_with_all = ["icache", "dcache"])]
    config: Option<PathBuf>,

    /// Seed for Random replacement.
    #[arg(long)]
    seed: Option<u64>,

    /// Print statistics as JSON.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Memory access trace.
    trace: PathBuf,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config, cachesim::common::ConfigError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config {
            general: GeneralConfig::default(),
            cache: CacheHierarchyConfig::from_args(args.icache.as_deref(), &args.dcache)?,
        },
    };
    if let Some(seed) = args.seed {
        config.general.seed = seed;
    }
    Ok(config)
}

/// Main entry point.
///
/// 1. **Configuration**: parses arguments and builds the cache configuration.
/// 2. **Initialization**: constructs the [`Hierarchy`], rejecting invalid geometry.
/// 3. **Simulation**: replays the trace in order.
/// 4. **Report**: prints per-level statistics and exits with 0, or 1 on any error.
fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    let mut hierarchy = Hierarchy::from_config(&config).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });

    let trace = File::open(&args.trace).unwrap_or_else(|e| {
        eprintln!("Could not open trace file '{}': {}", args.trace.display(), e);
        process::exit(1);
    });

    if !args.json {
        if let Err(e) = stats::write_config(&hierarchy, &mut io::stdout()) {
            eprintln!("failed to write configuration: {}", e);
            process::exit(1);
        }
    }

    if let Err(e) = sim::run_trace(&mut hierarchy, BufReader::new(trace)) {
        eprintln!("{}", e);
        process::exit(1);
    }

    let report = if args.json {
        stats::write_json(&hierarchy, &mut io::stdout())
    } else {
        stats::print(&hierarchy)
    };
    if let Err(e) = report {
        eprintln!("failed to write statistics: {}", e);
        process::exit(1);
    }
}
