use std::error::Error;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use gmx_core::ExperimentConfig;
use gmx_stats::{collect, corpus, CorpusSelection};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gmx", about = "Simulation statistics collection and reduction CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pivot raw run reports into per-benchmark CSV tables.
    Collect(CollectArgs),
    /// Merge collected tables into one tagged corpus CSV.
    Reduce(ReduceArgs),
    /// Validate an experiment configuration without running anything.
    Check(CheckArgs),
}

#[derive(ClapArgs, Debug)]
struct CollectArgs {
    /// Root of the raw results tree.
    #[arg(long, default_value = "results")]
    results_root: PathBuf,
    /// Architecture label the reports were produced under.
    #[arg(long)]
    arch: String,
    /// Output directory for collected tables and manifests.
    #[arg(long, default_value = "collected")]
    out: PathBuf,
    /// Experiments to collect.
    #[arg(required = true)]
    experiments: Vec<String>,
}

#[derive(ClapArgs, Debug)]
struct ReduceArgs {
    /// Directory of collected tables, as written by `gmx collect`.
    #[arg(long, default_value = "collected")]
    collected: PathBuf,
    /// Experiments to include; all when omitted.
    #[arg(short = 'e', long = "experiments")]
    experiments: Vec<String>,
    /// Benchmarks to include; all when omitted.
    #[arg(short = 'b', long = "benchmarks")]
    benchmarks: Vec<String>,
    /// Output corpus CSV path.
    #[arg(long, default_value = "results.csv")]
    out: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct CheckArgs {
    /// YAML experiment configuration to validate.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Collect(args) => run_collect(args),
        Command::Reduce(args) => run_reduce(args),
        Command::Check(args) => run_check(args),
    }
}

fn run_collect(args: CollectArgs) -> Result<(), Box<dyn Error>> {
    let manifests = collect::collect(&args.results_root, &args.arch, &args.experiments, &args.out)?;
    for manifest in &manifests {
        info!(
            experiment = %manifest.experiment,
            tables = manifest.sources.len(),
            "collected experiment"
        );
    }
    Ok(())
}

fn run_reduce(args: ReduceArgs) -> Result<(), Box<dyn Error>> {
    let selection = CorpusSelection::new(args.experiments, args.benchmarks);
    let summary = corpus::merge_corpus(&args.collected, &selection, &args.out)?;
    info!(
        tables = summary.tables,
        rows = summary.rows,
        out = %args.out.display(),
        "reduced corpus"
    );
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), Box<dyn Error>> {
    let config = ExperimentConfig::load(&args.config)?;
    info!(
        mode = %config.mode,
        workload = %config.workload,
        checkpoint = %config.checkpoint_path().display(),
        "configuration is valid"
    );
    Ok(())
}
