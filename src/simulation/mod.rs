// Monte-Carlo replay of the retransmission model. Each packet either arrives whole
// or gets sent exactly once more, which is what the `2 - P(arrive)` term assumes.

pub mod config;
pub use config::SimConfig;

use crate::model::{self, DomainError, LoadModel, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub size: f64,
    pub loss_rate: f64,
    pub trials: u64,
    pub retransmissions: u64,
    /// Mean transmissions per packet times the overhead factor.
    pub simulated_load: f64,
    pub expected_load: f64,
}

impl SimulationReport {
    pub fn abs_error(&self) -> f64 {
        (self.simulated_load - self.expected_load).abs()
    }
}

pub fn simulate_transmissions(
    load_model: &LoadModel,
    size: f64,
    loss_rate: f64,
    config: &SimConfig,
) -> Result<SimulationReport> {
    if config.trials == 0 {
        return Err(DomainError::InvalidTrials);
    }
    // validates size and loss rate before anything is drawn
    let expected_load = load_model.load_at(size, loss_rate)?;

    let fragments = model::fragments(size, load_model.mtu());
    let p_arrive = (1.0 - loss_rate).powf(fragments);
    let arrives = Bernoulli::new(p_arrive).map_err(|_| DomainError::InvalidLossRate(loss_rate))?;

    debug!(
        "Simulating {} trials: {} bytes, {:.3} fragments, P(arrive) = {:.6}",
        config.trials, size, fragments, p_arrive
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let retransmissions = (0..config.trials)
        .filter(|_| !arrives.sample(&mut rng))
        .count() as u64;

    let transmissions = (config.trials + retransmissions) as f64 / config.trials as f64;
    let simulated_load = transmissions * model::overhead_factor(size, load_model.overhead());

    info!(
        "{} trials, {} retransmissions, simulated load {:.5} vs expected {:.5}",
        config.trials, retransmissions, simulated_load, expected_load
    );

    Ok(SimulationReport {
        size,
        loss_rate,
        trials: config.trials,
        retransmissions,
        simulated_load,
        expected_load,
    })
}
