//! Page-table simulator CLI.
//!
//! This binary replays a memory access trace against the page-table schemes
//! and prints access and fault counts for each. It performs:
//! 1. **Setup:** Builds a `SimConfig` from the positional arguments, optionally layered over a JSON file.
//! 2. **Replay:** Streams the trace file through the simulator, one clock tick per record.
//! 3. **Report:** Prints the statistics as text (or JSON with `--json`).
//!
//! Any error is fatal: it is printed to stderr and the process exits with status 1.

use std::path::PathBuf;
use std::{fs, process};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pagesim_core::config::{PolicyKind, Scheme};
use pagesim_core::stats::SimReport;
use pagesim_core::trace::TraceReader;
use pagesim_core::{SimConfig, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "pagesim",
    author,
    version,
    about = "Page-table and page-replacement simulator",
    long_about = "Replays a memory trace (`<hex address> <R|W>` per line) against direct, \
                  hierarchical and inverted page tables and reports accesses and faults.\n\n\
                  Examples:\n  pagesim lru traces/compilador.log 4 128\n  \
                  pagesim 2a traces/matriz.log 8 64 --scheme inverted --json"
)]
struct Cli {
    /// Replacement policy: fifo, lru, 2a (second chance) or random.
    policy: String,

    /// Trace file to replay.
    trace: PathBuf,

    /// Page size in KiB (power of two).
    page_kb: u64,

    /// Physical memory size in KiB.
    memory_kb: u64,

    /// Log every fault and eviction to stderr.
    #[arg(short, long)]
    debug: bool,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Width of a virtual address in bits.
    #[arg(long)]
    address_bits: Option<u32>,

    /// Seed for the random policy.
    #[arg(long)]
    seed: Option<u64>,

    /// Page-table scheme to simulate (repeatable; default: all).
    #[arg(long = "scheme")]
    schemes: Vec<String>,

    /// Report sections to print: summary or tables (repeatable; default: all).
    #[arg(long = "section")]
    sections: Vec<String>,

    /// JSON configuration to start from; positional arguments override it.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Installs the stderr log subscriber.
///
/// `--debug` forces the `debug` level; otherwise `RUST_LOG` decides, falling
/// back to `warn`.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .without_time()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the configuration, replays the trace and prints the report.
fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    SimReport::check_sections(&cli.sections)?;
    let config = build_config(cli)?;
    let mut sim = Simulator::new(&config)?;

    let mut reader = TraceReader::open(&cli.trace)
        .map_err(|e| format!("{}: {e}", cli.trace.display()))?;
    info!(trace = %cli.trace.display(), "replaying trace");
    sim.run_trace(&mut reader)
        .map_err(|e| format!("{}: {e}", cli.trace.display()))?;
    info!(lines = reader.lines_read(), "trace consumed");

    let report = sim.report();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if cli.sections.is_empty() {
        report.print();
    } else {
        report.print_sections(&cli.sections);
    }
    Ok(())
}

/// Layers the command line over the optional JSON configuration.
fn build_config(cli: &Cli) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            serde_json::from_str::<SimConfig>(&text)?
        }
        None => SimConfig::default(),
    };

    config.policy = cli.policy.parse::<PolicyKind>()?;
    config.page_size = kib(cli.page_kb)?;
    config.memory_size = kib(cli.memory_kb)?;
    if let Some(bits) = cli.address_bits {
        config.address_bits = bits;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if !cli.schemes.is_empty() {
        config.schemes = cli
            .schemes
            .iter()
            .map(|s| s.parse::<Scheme>())
            .collect::<Result<_, _>>()?;
    }
    Ok(config)
}

/// Converts a KiB count from the command line to bytes.
fn kib(value: u64) -> Result<u64, String> {
    value
        .checked_mul(1024)
        .ok_or_else(|| format!("{value} KiB does not fit in 64 bits"))
}
