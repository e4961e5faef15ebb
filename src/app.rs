//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments (with `.env` / environment fallbacks)
//! - sets up logging
//! - runs the analysis pipeline
//! - prints reports/charts
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{AggregateArgs, AnalyzeArgs, Command, InputArgs, SampleArgs};
use crate::data::{SampleConfig, generate_sample, write_sample_csv};
use crate::domain::{AnalysisConfig, ChiSquareOptions};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `acq` binary.
pub fn run() -> Result<(), AppError> {
    // Environment defaults for clap's `env` fallbacks.
    dotenvy::dotenv().ok();

    // `acq --input x.csv` behaves like `acq analyze --input x.csv`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Aggregate(args) => handle_aggregate(args),
        Command::Sample(args) => handle_sample(args),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (tests, embedding) is not an error worth surfacing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));
    println!("{}", crate::report::format_aggregate_table(&run.aggregate));
    println!("{}", crate::report::format_statistics(&run.statistics));

    if config.plot {
        let charts = crate::plot::render_all(&run.classified, &run.aggregate, config.plot_width, config.plot_height);
        println!("{charts}");
    }

    // Optional exports.
    if let Some(path) = &config.export_aggregate {
        crate::io::export::write_aggregate_csv(path, &run.aggregate)?;
    }
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_json(path, &run.statistics)?;
    }

    Ok(())
}

fn handle_aggregate(args: AggregateArgs) -> Result<(), AppError> {
    let config = input_config(&args.input);
    let (_, _, tables) = pipeline::load_and_prepare(&config)?;

    match &args.export {
        Some(path) => crate::io::export::write_aggregate_csv(path, &tables.aggregate)?,
        None => println!("{}", crate::report::format_aggregate_table(&tables.aggregate)),
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        count: args.count,
        seed: args.seed,
        first_year: args.first_year,
        last_year: args.last_year,
    };
    let records = generate_sample(&config)?;
    write_sample_csv(&args.output, &records, &args.columns.to_column_names())?;

    println!("Wrote {} records to {}", records.len(), args.output.display());
    Ok(())
}

fn input_config(args: &InputArgs) -> AnalysisConfig {
    AnalysisConfig {
        columns: args.columns.to_column_names(),
        min_year: args.min_year,
        ..AnalysisConfig::for_path(args.input.clone())
    }
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    AnalysisConfig {
        chi_square: ChiSquareOptions {
            min_expected: args.min_expected,
            strict_expected: args.strict_expected,
            yates: args.yates,
        },
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_aggregate: args.export_aggregate.clone(),
        export_results: args.export_results.clone(),
        ..input_config(&args.input)
    }
}

/// Rewrite argv so a bare flag list defaults to `acq analyze`.
///
/// Rules:
/// - `acq -i FILE ...`              -> `acq analyze -i FILE ...`
/// - `acq --help/--version/-h`      -> unchanged (show top-level help/version)
/// - any argv naming a subcommand   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // Global flags like `-v` may precede the subcommand name.
    let names_subcommand = argv
        .iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "analyze" | "aggregate" | "sample"));
    if names_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
    }
    argv
}
