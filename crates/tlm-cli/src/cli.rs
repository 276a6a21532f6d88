use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tlm_merge::Engine;

#[derive(Parser)]
#[command(
    name = "tlm",
    about = "Timeline Merge — merge time-ordered record streams into one",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file with `engine` and `[merge]` settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge JSON-lines files to stdout
    Merge(MergeArgs),
    /// Merge seeded synthetic log sources
    Simulate(SimulateArgs),
}

/// Engine selection shared by every subcommand.
#[derive(Args, Clone, Debug, Default)]
pub struct EngineArgs {
    /// Merge engine: eager or bounded
    #[arg(short, long)]
    pub engine: Option<Engine>,
    /// Active-set capacity for the bounded engine
    #[arg(short, long)]
    pub capacity: Option<usize>,
}

#[derive(Args)]
pub struct MergeArgs {
    /// Input files, one JSON object per line, each sorted by time
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of sources
    #[arg(short, long, default_value = "100")]
    pub sources: usize,
    /// Records per source
    #[arg(short, long, default_value = "100")]
    pub records: usize,
    /// Simulated latency per pull, in milliseconds
    #[arg(long, default_value = "0")]
    pub latency_ms: u64,
    /// Base RNG seed; source i uses seed + i
    #[arg(long, default_value = "0")]
    pub seed: u64,
    /// Count records without printing them
    #[arg(short, long)]
    pub quiet: bool,
    #[command(flatten)]
    pub engine: EngineArgs,
}
