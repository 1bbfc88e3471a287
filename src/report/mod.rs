pub mod figure;
pub mod logger;

use crate::model::ModelConfig;
use crate::sweep::{OptimalSize, SweepConfig, SweepResults};
use anyhow::Result;
use logger::CurveLogger;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Byte count with a binary unit, e.g. `13.16 kB`.
pub fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} kB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

pub fn summary_lines(results: &SweepResults) -> Vec<String> {
    results.optimal.iter().map(OptimalSize::summary).collect()
}

/// What ends up in `<name>_optimal.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimalReport {
    pub generated_at: chrono::DateTime<chrono::Local>,
    pub model: ModelConfig,
    pub sweep: SweepConfig,
    pub optimal: Vec<OptimalSize>,
}

#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub sizes_csv: PathBuf,
    pub loss_rates_csv: PathBuf,
    pub optimal_json: PathBuf,
    pub figure_tex: PathBuf,
}

pub fn default_run_name() -> String {
    format!("load_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// Writes both curve families, the optimum summary and the figure into `dir`.
pub fn export_all(
    results: &SweepResults,
    model: &ModelConfig,
    sweep: &SweepConfig,
    dir: impl AsRef<Path>,
    name: &str,
) -> Result<ExportPaths> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let sizes_file = format!("{}_sizes.csv", name);
    let loss_rates_file = format!("{}_loss_rates.csv", name);
    let paths = ExportPaths {
        sizes_csv: dir.join(&sizes_file),
        loss_rates_csv: dir.join(&loss_rates_file),
        optimal_json: dir.join(format!("{}_optimal.json", name)),
        figure_tex: dir.join(format!("{}_figure.tex", name)),
    };

    CurveLogger::new(&paths.sizes_csv)?.log_curves("size", "loss_", &results.size_curves)?;
    info!("Size curves saved to: {}", paths.sizes_csv.display());

    CurveLogger::new(&paths.loss_rates_csv)?.log_curves("loss_rate", "size_", &results.loss_rate_curves)?;
    info!("Loss rate curves saved to: {}", paths.loss_rates_csv.display());

    let report = OptimalReport {
        generated_at: chrono::Local::now(),
        model: *model,
        sweep: sweep.clone(),
        optimal: results.optimal.clone(),
    };
    std::fs::write(&paths.optimal_json, serde_json::to_string_pretty(&report)?)?;
    info!("Optimal sizes saved to: {}", paths.optimal_json.display());

    figure::export_latex_figure(results, &sizes_file, &loss_rates_file, &paths.figure_tex)?;
    info!("Figure saved to: {}", paths.figure_tex.display());

    Ok(paths)
}
