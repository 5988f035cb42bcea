//! MMLEADS Report - command line entry point.
//!
//! Every flag is optional; a bare run uses the fixed workbook, sheet and
//! output names.

use anyhow::{Context, Result};
use clap::Parser;
use mmleads_report::{analyze, config::ReportConfig, logging, render};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "mmleads_report", about = "Medicare-Medicaid enrollment report")]
struct Cli {
    /// Workbook to read
    #[arg(long)]
    input: Option<PathBuf>,
    /// Sheet with the per-state records
    #[arg(long)]
    sheet: Option<String>,
    /// Directory the map, chart and report are written to
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// TOML file with report settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Open the report in the default viewer when done
    #[arg(long)]
    open: bool,
}

fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_toml_file(path)?,
        None => ReportConfig::default(),
    };
    if let Some(input) = cli.input {
        config.input = input;
    }
    if let Some(sheet) = cli.sheet {
        config.sheet = sheet;
    }
    if let Some(out_dir) = cli.out_dir {
        config.out_dir = out_dir;
    }

    let analysis = analyze(&config)
        .with_context(|| format!("could not analyze {}", config.input.display()))?;

    print!("{}", analysis.share_table);

    let artifacts = render(&config, &analysis)
        .with_context(|| format!("could not write outputs to {}", config.out_dir.display()))?;

    if let Some(dist) = &analysis.distribution {
        info!(
            mean = dist.mean,
            median = dist.median,
            max = dist.max,
            "enrollment share distribution"
        );
    }
    info!("report ready → {}", artifacts.report_path.display());

    if cli.open {
        if let Err(e) = open::that(&artifacts.report_path) {
            warn!("could not open report: {e}");
        }
    }

    Ok(())
}
