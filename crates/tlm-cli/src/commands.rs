use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use tracing::{info, warn};

use tlm_merge::{merge, Engine, MergeReport};
use tlm_source::{
    JsonLinesFile, Sink, SinkResult, SinkStats, StatsSink, SyntheticConfig, SyntheticSource,
    WriterSink,
};
use tlm_types::{Record, Timestamp};

use crate::cli::*;
use crate::config::CliConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let file_config = CliConfig::resolve(cli.config.as_deref())?;
    match cli.command {
        Command::Merge(args) => cmd_merge(file_config, args).await,
        Command::Simulate(args) => cmd_simulate(file_config, args).await,
    }
}

async fn cmd_merge(config: CliConfig, args: MergeArgs) -> anyhow::Result<()> {
    let config = config.with_overrides(&args.engine);
    let sources: Vec<JsonLinesFile> = args.files.iter().map(JsonLinesFile::new).collect();
    info!(files = sources.len(), engine = %config.engine, "merging files");
    warn_if_undersized(&config, sources.len());

    let mut sink = StatsSink::new(WriterSink::stdout());
    let report = merge(config.engine, &config.merge, sources, &mut sink).await?;
    print_summary(&config, &report, sink.stats());
    Ok(())
}

async fn cmd_simulate(config: CliConfig, args: SimulateArgs) -> anyhow::Result<()> {
    let config = config.with_overrides(&args.engine);
    let latency = (args.latency_ms > 0).then(|| Duration::from_millis(args.latency_ms));
    let start = Timestamp::now();
    let sources: Vec<SyntheticSource> = (0..args.sources)
        .map(|i| {
            SyntheticSource::new(SyntheticConfig {
                count: args.records,
                start,
                latency,
                seed: args.seed.wrapping_add(i as u64),
                ..Default::default()
            })
        })
        .collect();
    info!(
        sources = args.sources,
        records = args.records,
        engine = %config.engine,
        "simulating"
    );
    warn_if_undersized(&config, sources.len());

    let inner: Box<dyn Sink> = if args.quiet {
        Box::new(Discard)
    } else {
        Box::new(WriterSink::stdout())
    };
    let mut sink = StatsSink::new(inner);
    let report = merge(config.engine, &config.merge, sources, &mut sink).await?;
    print_summary(&config, &report, sink.stats());
    Ok(())
}

/// Sources beyond the active-set capacity are admitted late, so records that
/// overlap in time with already-emitted ones will reach the sink out of order.
fn warn_if_undersized(config: &CliConfig, sources: usize) {
    let capacity = config.merge.active_set_capacity;
    if config.engine == Engine::Bounded && sources > capacity {
        warn!(
            sources,
            capacity,
            "more sources than active-set capacity; late sources that overlap in time will be rejected"
        );
    }
}

fn print_summary(config: &CliConfig, report: &MergeReport, stats: &SinkStats) {
    eprintln!(
        "{} Merged {} records from {} sources ({} engine)",
        "✓".green().bold(),
        report.emitted.to_string().bold(),
        report.sources,
        config.engine.to_string().cyan()
    );
    if let (Some(first), Some(last)) = (stats.first, stats.last) {
        eprintln!(
            "  Span: {} → {}",
            first.to_rfc3339().yellow(),
            last.to_rfc3339().yellow()
        );
    }
    eprintln!(
        "  Pulls: {}  Peak active: {}  Batched: {}",
        report.pulls, report.peak_active, report.batched
    );
    eprintln!(
        "  Time: {:.3}s  Rate: {} records/s",
        stats.elapsed.as_secs_f64(),
        (stats.records_per_sec() as u64).to_string().bold()
    );
}

/// Sink that drops every record; used when only the statistics matter.
struct Discard;

#[async_trait]
impl Sink for Discard {
    async fn emit(&mut self, _record: Record) -> SinkResult<()> {
        Ok(())
    }

    async fn complete(&mut self) -> SinkResult<()> {
        Ok(())
    }
}
