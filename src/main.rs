mod bank;
mod config;
mod error;
mod explorer;
mod fix;
mod graph;
mod method_index;
mod oracle;
mod report;
mod rewriter;
mod score;
mod tracker;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, DEFAULT_DEPTH, DEFAULT_MAX_BATCH, DEFAULT_NULLABLE_ANNOTATION};
use crate::explorer::SearchLoop;
use crate::oracle::CommandOracle;
use crate::report::write_report;
use crate::rewriter::WorklistRewriter;

/// CLI arguments for nullfix execution.
#[derive(Parser, Debug)]
#[command(
    name = "nullfix",
    about = "Infers nullability annotation placements that minimize null-checker errors.",
    version
)]
struct Cli {
    /// Build command that runs the target project with the null checker enabled.
    #[arg(short = 'b', long = "command", value_name = "CMD")]
    command: Option<String>,
    /// Fully qualified name of the nullable annotation to inject.
    #[arg(short = 'n', long = "nullable", value_name = "FQN")]
    nullable: Option<String>,
    /// Fully qualified name of the initializer annotation.
    #[arg(short = 'i', long = "initializer", value_name = "FQN")]
    initializer: Option<String>,
    /// Directory where the checker writes its diagnostic and relation files.
    #[arg(short = 'd', long = "dir", value_name = "PATH")]
    dir: Option<PathBuf>,
    /// Maximum number of search rounds.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_DEPTH)]
    depth: u32,
    /// Keep searching to full depth even after rounds stop accepting fixes.
    #[arg(long)]
    disable_bailout: bool,
    /// Re-measure batches even when an earlier round already banked them.
    #[arg(long)]
    disable_cache: bool,
    /// Skip the contradiction check among a round's accepted fixes.
    #[arg(long)]
    disable_optimized: bool,
    /// Evaluate each fix jointly with every fix reachable through the graph.
    #[arg(long)]
    chain: bool,
    /// Ask the rewriter to preserve lexical formatting when editing sources.
    #[arg(long)]
    preserve_format: bool,
    /// Discover and report candidates without staging or applying any edit.
    #[arg(long)]
    dry_run: bool,
    /// Largest number of fixes evaluated in a single build.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_BATCH)]
    max_batch: usize,
    /// Seconds to wait for one build before treating it as failed.
    #[arg(long, value_name = "SECONDS")]
    build_timeout: Option<u64>,
    /// JSON config file carrying the same keys as the flags.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    std::fs::create_dir_all(&config.out_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.out_dir.display()
        )
    })?;

    let oracle = CommandOracle::new(
        config.build_command.clone(),
        config.required_outputs(),
        config.build_timeout,
    );
    let rewriter = WorklistRewriter::new(
        config.worklist_path(),
        config.applied_path(),
        config.preserve_format,
    );
    let mut search = SearchLoop::new(config.clone(), Box::new(oracle), Box::new(rewriter));
    let report = search.run()?;
    write_report(&config.report_path(), &report)?;
    info!(
        rounds = report.rounds.len(),
        total_accepted = report.total_accepted,
        stop_reason = ?report.stop_reason,
        report = %config.report_path().display(),
        "search finished"
    );
    Ok(())
}

fn resolve_config(cli: Cli) -> Result<Config> {
    if let Some(path) = &cli.config {
        return Config::from_file(path);
    }
    let build_command = cli
        .command
        .context("--command is required unless --config is given")?;
    let initializer_annotation = cli
        .initializer
        .context("--initializer is required unless --config is given")?;
    let out_dir = cli.dir.context("--dir is required unless --config is given")?;
    Ok(Config {
        build_command,
        nullable_annotation: cli
            .nullable
            .unwrap_or_else(|| DEFAULT_NULLABLE_ANNOTATION.to_string()),
        initializer_annotation,
        out_dir,
        depth: cli.depth,
        bailout: !cli.disable_bailout,
        use_cache: !cli.disable_cache,
        optimized: !cli.disable_optimized,
        chain: cli.chain,
        preserve_format: cli.preserve_format,
        dry_run: cli.dry_run,
        max_batch: cli.max_batch,
        build_timeout: cli.build_timeout.map(Duration::from_secs),
    })
}

/// Initialize logging facade with stderr output.
fn init_logging() {
    let init_result = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nullfix=info,warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
    let _ = init_result;
}
