use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tscat_core::EngineConfig;

use crate::check::{CheckArgs, run_check};
use crate::dump::{DumpArgs, run_dump};
use crate::error::Result;
use crate::lookup::{LookupArgs, run_lookup};
use crate::stats::{StatsArgs, run_stats};
use crate::telemetry::{self, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "tscat",
    about = "Look up, inspect, lint, and rewrite Qt Linguist translation catalogs",
    version
)]
pub struct Cli {
    /// Engine configuration file (TOML, or JSON by extension).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Tracing filter directives; defaults to `RUST_LOG`, then `warn`.
    #[arg(long = "log-filter", global = true)]
    pub log_filter: Option<String>,

    #[arg(long = "log-format", value_enum, global = true, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Translate one message.
    Lookup(LookupArgs),

    /// Print completion statistics.
    Stats(StatsArgs),

    /// Lint finished translations; exits 2 when findings exist.
    Check(CheckArgs),

    /// Re-serialize a catalog.
    Dump(DumpArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let filter = telemetry::filter_expression(cli.log_filter.as_deref());
    telemetry::initialise(&filter, cli.log_format)?;
    run(cli)
}

/// Dispatch to stdout.
pub fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_to(cli, &mut out)
}

pub fn run_to(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = EngineConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Lookup(args) => run_lookup(&args, &config, out),
        Commands::Stats(args) => run_stats(&args, &config, out),
        Commands::Check(args) => run_check(&args, &config, out),
        Commands::Dump(args) => run_dump(&args, &config, out),
    }
}
