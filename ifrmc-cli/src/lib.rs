#![warn(missing_docs)]
//! IFR Monte-Carlo CLI Library
//!
//! Command-line front end for the estimator. Settings are layered:
//! built-in reference study → `ifr.toml` → command-line flags.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     ifrmc_cli::run()
//! }
//! ```

mod config;
mod formatting;
mod report;

pub use config::*;
pub use formatting::format_human_output;
pub use report::build_report;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ifrmc_core::{AnalyticReference, RunConfig, SamplingModel, StudyParameters};
use ifrmc_report::{OutputFormat, generate_csv_report, generate_json_report};
use ifrmc_stats::NonFinitePolicy;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rayon::ThreadPoolBuilder;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// IFR Monte-Carlo CLI arguments
#[derive(Parser, Debug)]
#[command(name = "ifrmc")]
#[command(
    author,
    version,
    about = "Monte-Carlo estimate of the infection fatality rate from a serological study"
)]
pub struct Cli {
    /// Optional subcommand (Run, Init, Reference); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Population the fatalities were counted in
    #[arg(long)]
    pub population: Option<u64>,

    /// Individuals tested
    #[arg(long)]
    pub tested: Option<u64>,

    /// Positive results among the tested
    #[arg(long)]
    pub infected: Option<u64>,

    /// Fatalities in the population
    #[arg(long)]
    pub fatal: Option<u64>,

    /// Number of Monte-Carlo toys
    #[arg(long, short = 'n')]
    pub trials: Option<u64>,

    /// Infection model: gaussian, binomial
    #[arg(long, short = 'm')]
    pub model: Option<SamplingModel>,

    /// Fixed seed for reproducible toys
    #[arg(long)]
    pub seed: Option<u64>,

    /// NaN/infinite IFR toys: propagate, discard
    #[arg(long)]
    pub non_finite: Option<NonFinitePolicy>,

    /// Toys drawn per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (skips ifr.toml discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip histogram binning
    #[arg(long)]
    pub no_histograms: bool,

    /// Skip the analytic reference intervals
    #[arg(long)]
    pub no_reference: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of threads for parallel sorting
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0")]
    pub threads: usize,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw toys and extract the IFR intervals (default)
    Run,
    /// Print a default ifr.toml
    Init,
    /// Print the analytic intervals only, without sampling
    Reference,
}

/// Run the CLI with arguments from the process command line.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Logs go to stderr so JSON and CSV on stdout stay clean
    let filter = if cli.verbose { "ifrmc=debug" } else { "ifrmc=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = match &cli.config {
        Some(path) => IfrConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => IfrConfig::discover().unwrap_or_default(),
    };

    match cli.command {
        Some(Commands::Init) => {
            print!("{}", IfrConfig::default_toml());
        }
        Some(Commands::Reference) => {
            let output = format_reference(&resolve_params(&cli, &config))?;
            write_output(&cli, &output)?;
        }
        Some(Commands::Run) | None => {
            run_estimate(&cli, &config)?;
        }
    }

    Ok(())
}

/// Study parameters: flags override the config file
pub fn resolve_params(cli: &Cli, config: &IfrConfig) -> StudyParameters {
    let study = config.study.params();
    StudyParameters {
        population: cli.population.unwrap_or(study.population),
        tested: cli.tested.unwrap_or(study.tested),
        infected: cli.infected.unwrap_or(study.infected),
        fatal: cli.fatal.unwrap_or(study.fatal),
        trials: cli.trials.unwrap_or(study.trials),
    }
}

/// Build a RunConfig by layering: ifr.toml defaults → CLI overrides.
pub fn build_run_config(cli: &Cli, config: &IfrConfig) -> RunConfig {
    let sampling = &config.sampling;
    let mut run_config = RunConfig::new(
        resolve_params(cli, config),
        cli.model.unwrap_or(sampling.model),
    )
    .with_non_finite(cli.non_finite.unwrap_or(sampling.non_finite))
    .with_batch_size(cli.batch_size.unwrap_or(sampling.batch_size));

    if let Some(seed) = cli.seed.or(sampling.seed) {
        run_config = run_config.with_seed(seed);
    }
    if config.output.histograms && !cli.no_histograms {
        run_config = run_config.retaining_samples();
    }
    run_config
}

fn run_estimate(cli: &Cli, config: &IfrConfig) -> anyhow::Result<()> {
    let format_name = cli.format.as_deref().unwrap_or(config.output.format.as_str());
    let format: OutputFormat = format_name.parse().map_err(anyhow::Error::msg)?;

    // Configure Rayon thread pool for sorting
    if cli.threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    let run_config = build_run_config(cli, config);
    run_config.params.validate()?;

    // No infections leaves nothing to reference against; the toys still run
    let reference = if config.output.reference && !cli.no_reference {
        match AnalyticReference::compute(&run_config.params) {
            Ok(reference) => Some(reference),
            Err(e) => {
                warn!("analytic reference unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };

    let pb = if cli.quiet {
        ProgressBar::with_draw_target(Some(run_config.params.trials), ProgressDrawTarget::hidden())
    } else {
        ProgressBar::new(run_config.params.trials)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(format!("{} toys", run_config.model));

    let start_time = Instant::now();
    let estimate = ifrmc_core::run_with_progress(&run_config, |drawn| pb.set_position(drawn))?;
    pb.finish_and_clear();
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    info!(duration_ms, "estimation complete");

    let report = build_report(
        &estimate,
        reference.as_ref(),
        &config.histograms,
        duration_ms,
    );

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report),
        OutputFormat::Human => format_human_output(&report),
    };

    write_output(cli, &output)
}

fn format_reference(params: &StudyParameters) -> anyhow::Result<String> {
    let reference = AnalyticReference::compute(params)?;
    let mut output = String::new();
    output.push_str(&format!(
        "<IFR> = {:5.3} % (fatal / scaled infections = {} / {:.1})\n",
        reference.point_estimate * 100.0,
        params.fatal,
        params.scaled_infections()
    ));
    for (method, interval) in [
        ("clopper-pearson", reference.clopper_pearson_68),
        ("clopper-pearson", reference.clopper_pearson_95),
        ("poisson", reference.poisson_68),
        ("poisson", reference.poisson_95),
    ] {
        let pct = interval.scaled(100.0);
        output.push_str(&format!(
            "{:<16} CL{:.0}: [{:5.3} {:5.3}] %\n",
            method,
            pct.level * 100.0,
            pct.lower,
            pct.upper
        ));
    }
    Ok(output)
}

fn write_output(cli: &Cli, output: &str) -> anyhow::Result<()> {
    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }
    Ok(())
}
