//! Command-line parsing for the acquisition funding analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the statistics code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{ColumnNames, DEFAULT_MIN_YEAR};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "acq", version, about = "Museum acquisition funding analysis")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: summary, aggregate table, statistical tests and charts.
    Analyze(AnalyzeArgs),
    /// Print the (department, decade) aggregate table only (useful for scripting).
    Aggregate(AggregateArgs),
    /// Write a deterministic synthetic dataset in the input CSV format.
    Sample(SampleArgs),
}

/// Input file and filtering options shared by `analyze` and `aggregate`.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Museum objects CSV.
    #[arg(short, long, env = "ACQ_INPUT", value_name = "CSV")]
    pub input: PathBuf,

    /// Drop records accessioned before this year.
    #[arg(long, env = "ACQ_MIN_YEAR", default_value_t = DEFAULT_MIN_YEAR)]
    pub min_year: i32,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

/// Input column header overrides.
#[derive(Debug, Args, Clone)]
pub struct ColumnArgs {
    #[arg(long, env = "ACQ_ID_COLUMN", default_value = "Object ID")]
    pub id_column: String,

    #[arg(long, env = "ACQ_DEPARTMENT_COLUMN", default_value = "Department")]
    pub department_column: String,

    #[arg(long, env = "ACQ_CREDIT_COLUMN", default_value = "Credit Line")]
    pub credit_column: String,

    #[arg(long, env = "ACQ_YEAR_COLUMN", default_value = "AccessionYear")]
    pub year_column: String,
}

impl ColumnArgs {
    pub fn to_column_names(&self) -> ColumnNames {
        ColumnNames {
            object_id: self.id_column.clone(),
            department: self.department_column.clone(),
            credit_line: self.credit_column.clone(),
            accession_year: self.year_column.clone(),
        }
    }
}

/// Options for the full analysis.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Expected cell count below which the chi-square approximation is flagged.
    #[arg(long, env = "ACQ_MIN_EXPECTED", default_value_t = 5.0)]
    pub min_expected: f64,

    /// Fail the chi-square test (instead of warning) on low expected counts.
    #[arg(long)]
    pub strict_expected: bool,

    /// Apply Yates' continuity correction when the contingency table is 2x2.
    #[arg(long)]
    pub yates: bool,

    /// Skip the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the aggregate table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_aggregate: Option<PathBuf>,

    /// Export the statistical results (or their errors) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_results: Option<PathBuf>,
}

/// Options for `acq aggregate`.
#[derive(Debug, Args, Clone)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the table to CSV instead of printing it.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Options for `acq sample`.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Destination CSV.
    #[arg(short, long, value_name = "CSV")]
    pub output: PathBuf,

    /// Number of objects to generate.
    #[arg(short = 'n', long, default_value_t = 5000)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Earliest accession year (years before `--min-year` exercise the filter).
    #[arg(long, default_value_t = 1880)]
    pub first_year: i32,

    /// Latest accession year (defaults to the current year).
    #[arg(long)]
    pub last_year: Option<i32>,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_defaults() {
        let cli = Cli::try_parse_from(["acq", "analyze", "--input", "objects.csv"]).unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.input.input, PathBuf::from("objects.csv"));
        assert_eq!(args.input.columns.to_column_names(), ColumnNames::default());
        assert_eq!(args.min_expected, 5.0);
        assert!(!args.no_plot);
        assert!(!args.yates && !args.strict_expected);
    }

    #[test]
    fn charts_are_disabled_only_by_no_plot() {
        assert!(Cli::try_parse_from(["acq", "analyze", "-i", "x.csv", "--plot"]).is_err());
        let cli = Cli::try_parse_from(["acq", "analyze", "-i", "x.csv", "--no-plot"]).unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert!(args.no_plot);
    }

    #[test]
    fn verbose_is_global_and_counted() {
        let cli = Cli::try_parse_from(["acq", "aggregate", "-i", "x.csv", "-vv", "--min-year", "1950"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Aggregate(args) = cli.command else {
            panic!("expected aggregate");
        };
        assert_eq!(args.input.min_year, 1950);
    }

    #[test]
    fn column_overrides() {
        let cli = Cli::try_parse_from([
            "acq",
            "sample",
            "-o",
            "out.csv",
            "--credit-column",
            "creditline",
            "-n",
            "10",
        ])
        .unwrap();
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.count, 10);
        assert_eq!(args.columns.to_column_names().credit_line, "creditline");
    }
}
