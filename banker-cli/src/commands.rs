use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use banker_config::BankerConfig;
use banker_engine::{run_evaluation, run_fuzz_mode, run_scenario, verify_state_hash, RunReport};
use banker_telemetry::{EventLogger, MetricsRecorder};

#[derive(Parser)]
#[command(name = "banker", version, about)]
pub struct Cli {
    /// Configuration file; defaults to config/banker.yaml and BANKER_* variables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate the request in an input document
    Evaluate(EvaluateArgs),
    /// Evaluate a YAML scenario and check its expected decision
    Scenario(ScenarioArgs),
    /// Cross-check the evaluator against generated snapshots
    Fuzz(FuzzArgs),
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Input file; reads stdin when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Commit a granted request to the canonical state
    #[arg(long)]
    pub commit: bool,
    /// Fail unless the final state hashes to this value
    #[arg(long)]
    pub validate_hash: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    pub path: PathBuf,
    #[arg(long)]
    pub commit: bool,
    #[arg(long)]
    pub validate_hash: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct FuzzArgs {
    /// Seed of the first iteration; iteration `i` uses `seed + i`
    #[arg(long, default_value_t = 1)]
    pub seed: u64,
    #[arg(long, default_value_t = 1000)]
    pub iterations: usize,
    #[arg(long, default_value_t = 5)]
    pub processes: usize,
    #[arg(long, default_value_t = 3)]
    pub resources: usize,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => BankerConfig::load_from_path(path)?,
        None => BankerConfig::load()?,
    };
    EventLogger::init(&config.telemetry.log_level);
    let metrics = MetricsRecorder::new();

    match cli.command {
        Commands::Evaluate(args) => {
            let input = read_input(args.input.as_ref())?;
            config.evaluator.commit_on_grant |= args.commit;
            let report = run_evaluation(&input, &config, &metrics)?;
            finish(&report, args.validate_hash.as_deref())?;
        }
        Commands::Scenario(args) => {
            config.evaluator.commit_on_grant |= args.commit;
            let report = run_scenario(&args.path, &config, &metrics)?;
            finish(&report, args.validate_hash.as_deref())?;
        }
        Commands::Fuzz(args) => {
            let summary = run_fuzz_mode(
                args.seed,
                args.iterations,
                args.processes,
                args.resources,
                &metrics,
            )?;
            println!(
                "iterations={} granted={} would_be_unsafe={} exceeds_limits={} unsafe_current_state={}",
                summary.iterations,
                summary.granted,
                summary.would_be_unsafe,
                summary.exceeds_limits,
                summary.unsafe_current_state
            );
        }
    }

    if config.telemetry.metrics {
        eprint!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading input from {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading input from stdin")?;
            Ok(input)
        }
    }
}

/// Hash checks run before anything is printed so a mismatch leaves stdout
/// empty.
fn finish(report: &RunReport, validate_hash: Option<&str>) -> anyhow::Result<()> {
    if let Some(expected) = validate_hash {
        verify_state_hash(report, expected)?;
    }
    info!(decision = %report.decision, state_hash = %report.state_hash, "evaluation finished");
    print!("{}", report.output);
    Ok(())
}
