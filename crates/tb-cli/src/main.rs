//! ttbb CLI

mod config;
mod io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tb_analysis::{Analysis, AnalysisConfig, HistogramSet};

#[derive(Parser)]
#[command(name = "ttbb")]
#[command(about = "ttbb - top-pair plus b-jets event analysis")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an event file and write the normalized histograms
    Run {
        /// Run configuration (YAML, or JSON by extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Output file for results (pretty JSON). Overrides the config; defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Threads (0 = auto). Overrides the config.
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Print the booked histogram catalogue
    Catalogue {
        /// Optional run configuration (for the weight-histogram binning)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Run { config, output, threads } => cmd_run(&config, output, threads),
        Commands::Catalogue { config, output } => cmd_catalogue(config.as_ref(), output.as_ref()),
        Commands::Version => {
            println!("ttbb {}", tb_core::VERSION);
            Ok(())
        }
    }
}

fn cmd_run(config_path: &PathBuf, output: Option<PathBuf>, threads: Option<usize>) -> Result<()> {
    let mut cfg = config::read_run_config(config_path)
        .with_context(|| format!("failed to read run config {}", config_path.display()))?;
    if output.is_some() {
        cfg.output = output;
    }
    if let Some(t) = threads {
        cfg.threads = t;
    }
    cfg.validate()?;

    // Relative event paths resolve against the config file.
    let events_path = match config_path.parent() {
        Some(dir) if cfg.events.is_relative() => dir.join(&cfg.events),
        _ => cfg.events.clone(),
    };

    tracing::info!(path = %events_path.display(), "reading events");
    let events = io::read_events(&events_path)?;
    tracing::info!(events = events.len(), threads = cfg.threads, "events loaded");

    let mut analysis = Analysis::new(cfg.analysis)?;
    if cfg.threads == 1 {
        analysis.analyze_batch(&events)?;
    } else {
        if cfg.threads > 0 {
            // Best-effort; ignore if a global pool already exists.
            let _ = rayon::ThreadPoolBuilder::new().num_threads(cfg.threads).build_global();
        }
        analysis.analyze_batch_parallel(&events)?;
    }

    let cutflow = analysis.cutflow();
    tracing::info!(
        events = cutflow.events,
        vetoed = cutflow.n_vetoed(),
        sum_of_weights = cutflow.sum_of_weights,
        "processing complete"
    );

    let summary = analysis.finalize(cfg.cross_section_pb, cfg.sum_of_weights)?;
    tracing::info!(scale_factor = summary.scale_factor, "normalized");

    write_json(cfg.output.as_ref(), serde_json::to_value(&summary)?)
}

fn cmd_catalogue(config_path: Option<&PathBuf>, output: Option<&PathBuf>) -> Result<()> {
    let analysis_cfg = match config_path {
        Some(path) => config::read_run_config(path)?.analysis,
        None => AnalysisConfig::default(),
    };
    let set = HistogramSet::book(&analysis_cfg)?;

    let entries: Vec<serde_json::Value> = set
        .iter()
        .map(|(key, h)| {
            serde_json::json!({
                "name": key.name(),
                "region": key.region.name(),
                "observable": key.observable.stem(),
                "bins": h.n_bins(),
                "low": h.edges().first(),
                "high": h.edges().last(),
                "density": h.is_density(),
            })
        })
        .collect();
    write_json(output, serde_json::json!({ "histograms": entries }))
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
