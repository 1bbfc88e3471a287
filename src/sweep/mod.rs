pub mod config;
pub use config::SweepConfig;

use crate::model::{LoadModel, Result, arg_min_load};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Every integer size from 1 up to, not including, `max_size`.
pub fn size_sweep(max_size: u32) -> Vec<f64> {
    (1..max_size).map(f64::from).collect()
}

/// `points` values spaced evenly in log10 between `10^start` and `10^stop`, both included.
pub fn log_space(start: f64, stop: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![10f64.powf(start)],
        _ => {
            let step = (stop - start) / (points - 1) as f64;
            (0..points)
                .map(|i| {
                    // pin the endpoint instead of trusting the accumulated step
                    let exponent = if i == points - 1 { stop } else { start + i as f64 * step };
                    10f64.powf(exponent)
                })
                .collect()
        }
    }
}

/// Loads over one independent variable with the other input held at `parameter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCurve {
    pub label: String,
    pub parameter: f64,
    pub xs: Vec<f64>,
    pub loads: Vec<f64>,
}

impl LoadCurve {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalSize {
    pub loss_rate: f64,
    pub index: usize,
    pub size: u32,
    pub load: f64,
}

impl OptimalSize {
    /// `"{pct}% loss rate -> optimal size = {size} bytes"`
    pub fn summary(&self) -> String {
        format!(
            "{}% loss rate -> optimal size = {} bytes",
            self.loss_rate * 100.0,
            self.size
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResults {
    /// Load vs size, one curve per fixed loss rate.
    pub size_curves: Vec<LoadCurve>,
    /// Load vs loss rate, one curve per fixed size.
    pub loss_rate_curves: Vec<LoadCurve>,
    pub optimal: Vec<OptimalSize>,
}

pub fn run_sweeps(model: &LoadModel, config: &SweepConfig) -> Result<SweepResults> {
    sweep_with(model, config, ProgressBar::hidden())
}

/// Same as [`run_sweeps`] with a progress bar ticking once per finished curve.
pub fn run_sweeps_with_progress(model: &LoadModel, config: &SweepConfig) -> Result<SweepResults> {
    let total = (config.loss_rates.len() + config.sizes.len()) as u64;
    let pb = ProgressBar::new(total);
    // keep the default style if the template is rejected
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.orange/yellow} {pos}/{len} curves {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }
    let results = sweep_with(model, config, pb.clone());
    pb.finish_with_message("sweeps complete");
    results
}

fn sweep_with(model: &LoadModel, config: &SweepConfig, pb: ProgressBar) -> Result<SweepResults> {
    let sizes = size_sweep(model.config().max_size);
    let loss_rates = log_space(config.log_start, config.log_stop, config.log_points);

    info!(
        "Sweeping {} sizes x {} loss rates, {} loss rate points x {} sizes",
        sizes.len(),
        config.loss_rates.len(),
        loss_rates.len(),
        config.sizes.len()
    );

    // Curves are independent; rayon keeps the collected order equal to the input order.
    let sized: Vec<(LoadCurve, OptimalSize)> = config
        .loss_rates
        .par_iter()
        .map(|&loss_rate| -> Result<(LoadCurve, OptimalSize)> {
            let loads = model.load(&sizes, loss_rate)?;
            let index = arg_min_load(&loads)?;
            let optimal = OptimalSize {
                loss_rate,
                index,
                size: sizes[index] as u32,
                load: loads[index],
            };
            debug!("loss rate {} -> min load {:.6} at {} bytes", loss_rate, optimal.load, optimal.size);
            pb.inc(1);
            Ok((
                LoadCurve {
                    label: format!("Loss rate={}", loss_rate),
                    parameter: loss_rate,
                    xs: sizes.clone(),
                    loads,
                },
                optimal,
            ))
        })
        .collect::<Result<_>>()?;

    let loss_rate_curves: Vec<LoadCurve> = config
        .sizes
        .par_iter()
        .map(|&size| -> Result<LoadCurve> {
            let loads = model.load(f64::from(size), &loss_rates)?;
            pb.inc(1);
            Ok(LoadCurve {
                label: format!("Size={} Bytes", size),
                parameter: f64::from(size),
                xs: loss_rates.clone(),
                loads,
            })
        })
        .collect::<Result<_>>()?;

    let (size_curves, optimal) = sized.into_iter().unzip();

    Ok(SweepResults {
        size_curves,
        loss_rate_curves,
        optimal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DomainError, ModelConfig};

    fn reference() -> SweepResults {
        let model = LoadModel::new(ModelConfig::default()).unwrap();
        run_sweeps(&model, &SweepConfig::default()).unwrap()
    }

    #[test]
    fn size_sweep_starts_at_one() {
        let sizes = size_sweep(65535);
        assert_eq!(sizes.len(), 65534);
        assert_eq!(sizes[0], 1.0);
        assert_eq!(sizes[sizes.len() - 1], 65534.0);
    }

    #[test]
    fn log_space_hits_both_decades() {
        let rates = log_space(-4.0, 0.0, 100);
        assert_eq!(rates.len(), 100);
        assert!((rates[0] - 1e-4).abs() < 1e-18);
        assert_eq!(rates[99], 1.0);
        assert!(rates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn log_space_degenerate_counts() {
        assert!(log_space(-4.0, 0.0, 0).is_empty());
        assert_eq!(log_space(-2.0, 0.0, 1), vec![10f64.powf(-2.0)]);
    }

    #[test]
    fn reference_optimal_sizes_are_pinned() {
        let results = reference();
        let sizes: Vec<(f64, u32)> = results.optimal.iter().map(|o| (o.loss_rate, o.size)).collect();
        assert_eq!(sizes, vec![(0.001, 13474), (0.01, 4294), (0.1, 1500), (0.5, 1500)]);
    }

    #[test]
    fn curves_follow_configured_order() {
        let results = reference();
        let rates: Vec<f64> = results.size_curves.iter().map(|c| c.parameter).collect();
        assert_eq!(rates, vec![0.001, 0.01, 0.1, 0.5]);
        let sizes: Vec<f64> = results.loss_rate_curves.iter().map(|c| c.parameter).collect();
        assert_eq!(sizes, vec![100.0, 400.0, 1200.0, 1500.0, 4000.0, 10000.0]);
        assert_eq!(results.loss_rate_curves[0].label, "Size=100 Bytes");
        assert_eq!(results.size_curves[0].label, "Loss rate=0.001");
    }

    #[test]
    fn curve_lengths_match_their_sweep() {
        let results = reference();
        assert!(results.size_curves.iter().all(|c| c.len() == 65534 && c.loads.len() == 65534));
        assert!(results.loss_rate_curves.iter().all(|c| c.len() == 100 && c.loads.len() == 100));
    }

    #[test]
    fn optimal_index_points_into_the_curve() {
        let results = reference();
        for (curve, optimal) in results.size_curves.iter().zip(&results.optimal) {
            assert_eq!(curve.xs[optimal.index] as u32, optimal.size);
            assert_eq!(curve.loads[optimal.index], optimal.load);
        }
    }

    #[test]
    fn summary_line_reports_percentage() {
        let results = reference();
        assert_eq!(results.optimal[3].summary(), "50% loss rate -> optimal size = 1500 bytes");
        assert_eq!(results.optimal[0].summary(), "0.1% loss rate -> optimal size = 13474 bytes");
    }

    #[test]
    fn sweeps_are_reproducible() {
        let a = reference();
        let b = reference();
        assert_eq!(a.optimal, b.optimal);
    }

    #[test]
    fn invalid_fixed_values_surface_as_domain_errors() {
        let model = LoadModel::new(ModelConfig::default().with_max_size(100)).unwrap();
        let bad_rate = SweepConfig::default().with_loss_rates(vec![0.1, 2.0]);
        assert_eq!(run_sweeps(&model, &bad_rate).unwrap_err(), DomainError::InvalidLossRate(2.0));

        let bad_size = SweepConfig::default().with_sizes(vec![0]);
        assert_eq!(run_sweeps(&model, &bad_size).unwrap_err(), DomainError::InvalidSize(0.0));
    }
}
