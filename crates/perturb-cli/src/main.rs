mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{RunConfig, DEFAULT_FS};
use log::info;
use perturb_lib::{
    batch::{run_batch, BatchSummary},
    io::{export, text as text_io, trials as trials_io},
    metrics::baseline::DEFAULT_BASELINE_SECONDS,
    pipeline::{analyze_trial, ExtractionConfig},
    signal::{ReferencePoints, TimeSeries},
};
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "perturb",
    version,
    about = "Belt perturbation parameters from treadmill velocity recordings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one trial read as newline-delimited velocity samples from stdin or --input
    Analyze {
        #[arg(long, default_value_t = DEFAULT_FS)]
        fs: u32,
        #[arg(long)]
        input: Option<PathBuf>,
        /// Touchdown reference (sample index)
        #[arg(long, allow_hyphen_values = true)]
        touchdown: f64,
        /// Foot-off reference (sample index); 0 means missing
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        footoff: f64,
        #[arg(long, default_value_t = 1.0)]
        multiplier: f64,
        #[arg(long, default_value_t = DEFAULT_BASELINE_SECONDS)]
        baseline_seconds: u32,
    },
    /// Analyze every trial of a nested trial file and write a parameter table
    Batch {
        /// TOML run file; command-line options override its values
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Per-trial success/failure ledger (CSV)
        #[arg(long)]
        ledger: Option<PathBuf>,
        #[arg(long)]
        fs: Option<u32>,
        #[arg(long)]
        multiplier: Option<f64>,
        #[arg(long)]
        baseline_seconds: Option<u32>,
        /// Worker threads, 0 = one per CPU
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            fs,
            input,
            touchdown,
            footoff,
            multiplier,
            baseline_seconds,
        } => cmd_analyze(
            fs,
            input.as_deref(),
            ReferencePoints::new(touchdown, footoff),
            ExtractionConfig {
                multiplier,
                baseline_seconds,
            },
        )?,
        Commands::Batch {
            config,
            input,
            out,
            ledger,
            fs,
            multiplier,
            baseline_seconds,
            jobs,
        } => {
            let overrides = RunConfig {
                input,
                output: out,
                ledger,
                fs,
                multiplier,
                baseline_seconds,
                jobs,
            };
            cmd_batch(config.as_deref(), overrides)?
        }
    }
    Ok(())
}

fn read_samples(input: Option<&Path>) -> Result<Vec<f64>> {
    match input {
        Some(path) => text_io::read_velocity_samples(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            text_io::parse_velocity_samples(&buf)
        }
    }
}

fn cmd_analyze(
    fs: u32,
    input: Option<&Path>,
    references: ReferencePoints,
    cfg: ExtractionConfig,
) -> Result<()> {
    let ts = TimeSeries::new(fs, read_samples(input)?);
    let analysis = analyze_trial(&ts, &references, &cfg)?;
    let js = serde_json::to_string(&analysis)?;
    println!("{}", js);
    Ok(())
}

fn cmd_batch(config: Option<&Path>, overrides: RunConfig) -> Result<()> {
    let file_cfg = match config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let settings = file_cfg.merge(overrides).resolve()?;
    let trials = trials_io::read_trials(&settings.input)?;
    info!(
        "loaded {} trial(s) from {}",
        trials.len(),
        settings.input.display()
    );

    let outcomes = run_batch(trials, settings.fs, &settings.extraction, settings.jobs);
    let rows = export::write_parameters_csv(&settings.output, &outcomes)
        .context("exporting parameters")?;
    info!("wrote {} row(s) to {}", rows, settings.output.display());
    if let Some(ledger) = &settings.ledger {
        export::write_ledger_csv(ledger, &outcomes).context("exporting ledger")?;
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
