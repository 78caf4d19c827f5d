#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
//! `evict` - Scores old build archives by age and size and plans which to delete.

use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

use clap::Parser;
use clap_cargo::style::CLAP_STYLING;
use evict::config::{EvictConfig, parse_size};
use evict::evictor;
use evict::types::{DEFAULT_MANIFEST, DEFAULT_TARGET_SIZE};
use tracing_subscriber::{EnvFilter, fmt};

/// CLI arguments for `evict`
///
/// Paths to delete are printed to stdout, one per line, for a deletion agent
/// to consume. Scores and logs go to stderr.
#[derive(Parser, Debug)]
#[command(author, version, about, styles = CLAP_STYLING)]
struct Cli {
    /// Directory holding one subdirectory per package
    #[arg(default_value = ".")]
    root:        PathBuf,
    /// Manifest of current `name version` pairs, one per line
    #[arg(default_value = DEFAULT_MANIFEST)]
    manifest:    PathBuf,
    /// Trim remaining archives down to this size (bytes, or with K/M/G/T suffix)
    #[arg(long, value_parser = parse_size, default_value_t = DEFAULT_TARGET_SIZE)]
    target_size: u64,
    /// Do not print per-archive scores to stderr
    #[arg(short, long)]
    quiet:       bool,
}

impl From<Cli> for EvictConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root:        cli.root,
            manifest:    cli.manifest,
            target_size: cli.target_size,
            show_scores: !cli.quiet,
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default: warn)
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = EvictConfig::from(cli);
    let now = SystemTime::now();

    let result = evictor::run(&config, now, &mut io::stderr().lock(), &mut io::stdout().lock());

    if let Err(e) = result {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
