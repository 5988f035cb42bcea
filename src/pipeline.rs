//! End-to-end report pipeline: load → clean → aggregate → trends, then
//! map → chart → report.

use crate::charts::{ChartError, ChoroplethMap, LineChartRenderer};
use crate::config::ReportConfig;
use crate::data::{
    CleanError, CleanReport, DataCleaner, LoaderError, TrendExtractor, WorkbookLoader,
    YearlyRaceTable,
};
use crate::report::{ReportComposer, ReportContent, ReportError};
use crate::stats::{
    AggregateError, EnrollmentShare, RaceTrend, ShareDistribution, StateAggregator, StateSummary,
    StatsCalculator,
};
use chrono::Local;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, info_span, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Clean(#[from] CleanError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Results of the load, clean and aggregate stages. Nothing is written yet.
#[derive(Debug)]
pub struct Analysis {
    pub clean_report: CleanReport,
    pub summaries: Vec<StateSummary>,
    pub shares: Vec<EnrollmentShare>,
    pub share_table: String,
    pub trends: YearlyRaceTable,
    pub distribution: Option<ShareDistribution>,
    pub race_trends: Vec<RaceTrend>,
}

/// Files written by the rendering stage.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub map_path: PathBuf,
    pub chart_path: PathBuf,
    pub report_path: PathBuf,
}

/// Everything one run produced.
#[derive(Debug)]
pub struct PipelineOutput {
    pub clean_report: CleanReport,
    pub summaries: Vec<StateSummary>,
    pub shares: Vec<EnrollmentShare>,
    pub share_table: String,
    pub trends: YearlyRaceTable,
    pub distribution: Option<ShareDistribution>,
    pub race_trends: Vec<RaceTrend>,
    pub map_path: PathBuf,
    pub chart_path: PathBuf,
    pub report_path: PathBuf,
}

/// Load the workbook and compute every table the artifacts are built from.
pub fn analyze(config: &ReportConfig) -> Result<Analysis, PipelineError> {
    let _span = info_span!("analyze", input = %config.input.display()).entered();

    // ─── 1) primary sheet → typed records ───────────────────────────
    let mut loader = WorkbookLoader::open(&config.input)?;
    let sheet = loader.load_sheet(&config.sheet, config.header_row)?;
    let (records, clean_report) = DataCleaner::clean(&sheet)?;

    // ─── 2) per-state reductions ────────────────────────────────────
    let summaries = StateAggregator::summarize(&records)?;
    let shares = StateAggregator::enrollment_shares(&records)?;
    let share_table = StateAggregator::format_share_table(&shares);
    info!(
        states = summaries.len(),
        shares = shares.len(),
        "aggregated {} records",
        records.len()
    );
    if shares.is_empty() {
        warn!(sheet = %config.sheet, "no non-national rows; map will be empty");
    }

    // ─── 3) yearly race trends ──────────────────────────────────────
    let trends = TrendExtractor::extract_all(loader.load_all_sheets(config.header_row, true));
    info!(
        years = trends.rows.len(),
        skipped = trends.skipped.len(),
        "extracted race trends"
    );

    let distribution = StatsCalculator::share_distribution(&shares);
    let race_trends = StatsCalculator::race_trends(&trends);

    Ok(Analysis {
        clean_report,
        summaries,
        shares,
        share_table,
        trends,
        distribution,
        race_trends,
    })
}

/// Write the map, the chart and the combined report into the output
/// directory. Files already written stay in place when a later one fails.
pub fn render(config: &ReportConfig, analysis: &Analysis) -> Result<Artifacts, PipelineError> {
    let _span = info_span!("render", out_dir = %config.out_dir.display()).entered();

    fs::create_dir_all(&config.out_dir).map_err(|source| PipelineError::OutputDir {
        path: config.out_dir.clone(),
        source,
    })?;

    let map_path = config.map_path();
    ChoroplethMap::new(&config.map_title, &analysis.shares).write(&map_path)?;

    let chart_path = config.chart_path();
    LineChartRenderer::write(
        &analysis.trends,
        &config.chart_title,
        config.chart_width,
        config.chart_height,
        &chart_path,
    )?;

    let report_path = config.report_path();
    ReportComposer::write(
        &ReportContent {
            title: &config.report_title,
            map_heading: &config.map_heading,
            map_href: &config.map_file,
            chart_heading: &config.chart_title,
            chart_src: &config.chart_file,
            distribution: analysis.distribution.as_ref(),
            trends: &analysis.race_trends,
            generated_at: Local::now(),
        },
        &report_path,
    )?;

    Ok(Artifacts {
        map_path,
        chart_path,
        report_path,
    })
}

/// Run every stage once, in order. Any error aborts the run.
pub fn run(config: &ReportConfig) -> Result<PipelineOutput, PipelineError> {
    let analysis = analyze(config)?;
    let artifacts = render(config, &analysis)?;

    Ok(PipelineOutput {
        clean_report: analysis.clean_report,
        summaries: analysis.summaries,
        shares: analysis.shares,
        share_table: analysis.share_table,
        trends: analysis.trends,
        distribution: analysis.distribution,
        race_trends: analysis.race_trends,
        map_path: artifacts.map_path,
        chart_path: artifacts.chart_path,
        report_path: artifacts.report_path,
    })
}
