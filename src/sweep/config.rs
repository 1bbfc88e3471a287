use serde::{Deserialize, Serialize};

/// Curve parameters for the two sweeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// One size curve per loss rate.
    pub loss_rates: Vec<f64>,
    /// One loss rate curve per packet size, in bytes.
    pub sizes: Vec<u32>,
    /// Decade exponents bounding the loss rate axis.
    pub log_start: f64,
    pub log_stop: f64,
    pub log_points: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            loss_rates: vec![0.001, 0.01, 0.1, 0.5],
            sizes: vec![100, 400, 1200, 1500, 4000, 10000],
            log_start: -4.0,
            log_stop: 0.0,
            log_points: 100,
        }
    }
}

impl SweepConfig {
    pub fn with_loss_rates(mut self, loss_rates: Vec<f64>) -> Self {
        self.loss_rates = loss_rates;
        self
    }

    pub fn with_sizes(mut self, sizes: Vec<u32>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_log_range(mut self, start: f64, stop: f64, points: usize) -> Self {
        self.log_start = start;
        self.log_stop = stop;
        self.log_points = points;
        self
    }
}
