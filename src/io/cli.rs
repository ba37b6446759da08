//! Command-line interface for batch Flow-LISA and Coulter equity runs

use crate::analysis::equity::{EquityReport, RegionAggregate, normalize_demand};
use crate::analysis::lisa::{LisaConfig, LisaSummary, ZeroIntensityPolicy, run_flow_lisa_with_progress};
use crate::io::configuration::{
    DEFAULT_DESTINATION_COLUMN, DEFAULT_INTENSITY_COLUMN, DEFAULT_ORIGIN_COLUMN,
    EQUITY_INDEX_SUFFIX, EQUITY_OUTPUT_SUFFIX, LISA_OUTPUT_SUFFIX, SIGNIFICANCE_THRESHOLD,
};
use crate::io::error::{AnalysisError, Result, WithPath, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::io::table::{Table, read_numeric_matrix};
use crate::math::moments::standardize;
use crate::spatial::distance::DistanceMatrix;
use crate::spatial::flows::{FlowColumns, FlowTable};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "flowlisa")]
#[command(
    author,
    version,
    about = "Flow-LISA clustering of OD flows and Coulter supply-demand inequity"
)]
/// Command-line arguments for the analysis tool
pub struct Cli {
    /// Analysis to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Available analyses
#[derive(Subcommand)]
pub enum Command {
    /// Classify OD flows into Flow-LISA clusters
    Lisa(LisaArgs),
    /// Compute Coulter's inequity index and adjustment coefficients
    Equity(EquityArgs),
}

/// Arguments of the `lisa` subcommand
#[derive(Args)]
pub struct LisaArgs {
    /// Flow table CSV
    #[arg(short, long, value_name = "CSV")]
    pub flows: PathBuf,

    /// Square region distance matrix CSV
    #[arg(short, long, value_name = "CSV")]
    pub distances: PathBuf,

    /// Annotated output CSV (defaults to `<flows>_lisa.csv`)
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Origin region identifier column
    #[arg(long, default_value = DEFAULT_ORIGIN_COLUMN)]
    pub origin_column: String,

    /// Destination region identifier column
    #[arg(long, default_value = DEFAULT_DESTINATION_COLUMN)]
    pub destination_column: String,

    /// Intensity column; repeat to analyse several columns in one pass
    #[arg(short, long = "intensity", default_value = DEFAULT_INTENSITY_COLUMN)]
    pub intensities: Vec<String>,

    /// Absolute z-score at or beyond which a flow is significant
    #[arg(short, long, default_value_t = SIGNIFICANCE_THRESHOLD)]
    pub threshold: f64,

    /// Handling of zero-intensity flows: propagate, zero or reject
    #[arg(long, default_value = "propagate")]
    pub zero_intensity: ZeroIntensityPolicy,

    /// Z-score the intensity columns before the analysis
    #[arg(long)]
    pub standardize: bool,

    /// Treat the first row of the distance matrix as data, not labels
    #[arg(long)]
    pub no_distance_header: bool,

    /// Write a JSON summary of every run
    #[arg(long, value_name = "JSON")]
    pub summary: Option<PathBuf>,
}

/// Arguments of the `equity` subcommand
#[derive(Args)]
pub struct EquityArgs {
    /// Region aggregate CSV
    #[arg(short, long, value_name = "CSV")]
    pub aggregates: PathBuf,

    /// Output CSV with coefficient columns (defaults to `<aggregates>_coulter.csv`)
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Convert raw demand columns to shares of their totals first
    #[arg(long)]
    pub normalize_demand: bool,

    /// JSON file for the six inequity indices (defaults to `<aggregates>_coulter_index.json`)
    #[arg(long, value_name = "JSON")]
    pub summary: Option<PathBuf>,
}

impl LisaArgs {
    /// Validated numeric configuration
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error for a bad threshold
    pub fn config(&self) -> Result<LisaConfig> {
        LisaConfig::new(self.threshold, self.zero_intensity)
    }

    /// Flow table columns for the first intensity
    pub fn columns(&self) -> FlowColumns {
        FlowColumns {
            origin: self.origin_column.clone(),
            destination: self.destination_column.clone(),
            intensity: self
                .intensities
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_INTENSITY_COLUMN.to_string()),
        }
    }

    /// Where the annotated table goes
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| derived_output_path(&self.flows, LISA_OUTPUT_SUFFIX))
    }
}

impl EquityArgs {
    /// Where the coefficient table goes
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| derived_output_path(&self.aggregates, EQUITY_OUTPUT_SUFFIX))
    }

    /// Where the inequity indices go
    pub fn summary_path(&self) -> PathBuf {
        self.summary.clone().unwrap_or_else(|| {
            derived_output_path(&self.aggregates, EQUITY_INDEX_SUFFIX).with_extension("json")
        })
    }
}

/// Orchestrates one command with progress tracking
pub struct Runner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl Runner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the selected command
    ///
    /// # Errors
    ///
    /// Returns an error if loading, analysis or writing fails
    pub fn process(&mut self) -> Result<()> {
        let start_time = Instant::now();
        match &self.cli.command {
            Command::Lisa(args) => run_lisa(args, self.progress_manager.as_mut())?,
            Command::Equity(args) => run_equity(args)?,
        }
        log::info!("Finished in {:.2?}", start_time.elapsed());
        Ok(())
    }
}

/// Run Flow-LISA for every requested intensity column and write the results
///
/// # Errors
///
/// Returns an error if an input can't be loaded, an analysis fails, or an
/// output can't be written
pub fn run_lisa(args: &LisaArgs, mut progress: Option<&mut ProgressManager>) -> Result<()> {
    if args.intensities.is_empty() {
        return Err(invalid_parameter(
            "intensity",
            &"",
            &"at least one intensity column is required",
        ));
    }
    let config = args.config()?;
    let base_columns = args.columns();

    let mut table = Table::read_csv(&args.flows)?;
    let matrix = DistanceMatrix::from_rows(read_numeric_matrix(
        &args.distances,
        !args.no_distance_header,
    )?)?;
    log::info!(
        "Loaded {} flows and a {}-region distance matrix",
        table.len(),
        matrix.region_count()
    );

    if let Some(pm) = progress.as_deref_mut() {
        pm.initialize(args.intensities.len());
    }

    let prefixed = args.intensities.len() > 1;
    let mut summaries: Vec<LisaSummary> = Vec::with_capacity(args.intensities.len());

    for intensity in &args.intensities {
        let columns = base_columns.with_intensity(intensity);
        let mut flows = FlowTable::from_table(&table, &columns)?;
        if args.standardize {
            flows = flows.with_intensities(&standardize(&flows.intensities())?)?;
        }

        if let Some(pm) = progress.as_deref_mut() {
            pm.start_run(intensity, flows.len());
        }
        let lisa = run_flow_lisa_with_progress(&flows, &matrix, &config, |rows| {
            if let Some(pm) = progress.as_deref() {
                pm.update_rows(rows);
            }
        })?;
        if let Some(pm) = progress.as_deref_mut() {
            pm.complete_run();
        }

        lisa.annotate(&mut table, prefixed.then_some(intensity.as_str()))?;
        summaries.push(lisa.summary(intensity, &config));
    }

    if let Some(pm) = progress.as_deref() {
        pm.finish();
    }

    let output_path = args.output_path();
    table.write_csv(&output_path)?;
    log::info!("Wrote annotated flows to {}", output_path.display());

    if let Some(ref summary_path) = args.summary {
        write_json(summary_path, &summaries)?;
    }
    Ok(())
}

/// Compute both Coulter measures for all six combinations and write the results
///
/// # Errors
///
/// Returns an error if the aggregate table can't be loaded, a measure can't
/// be computed, or an output can't be written
pub fn run_equity(args: &EquityArgs) -> Result<()> {
    let mut table = Table::read_csv(&args.aggregates)?;
    let mut aggregates = RegionAggregate::from_table(&table)?;
    if args.normalize_demand {
        aggregates = normalize_demand(&aggregates)?;
    }
    log::info!("Loaded {} region aggregates", aggregates.len());

    let report = EquityReport::compute(&aggregates)?;
    report.annotate(&mut table)?;

    let output_path = args.output_path();
    table.write_csv(&output_path)?;
    log::info!("Wrote adjustment coefficients to {}", output_path.display());

    write_json(&args.summary_path(), &report)?;
    Ok(())
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| AnalysisError::FileSystem {
        path: path.to_path_buf(),
        operation: "create",
        source,
    })?;
    serde_json::to_writer_pretty(file, value).with_path(path)?;
    log::info!("Wrote summary to {}", path.display());
    Ok(())
}

/// `<dir>/<stem><suffix>.csv` next to the input file
pub fn derived_output_path(input_path: &Path, suffix: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let output_name = format!("{}{suffix}.csv", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}
