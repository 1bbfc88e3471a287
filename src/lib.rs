pub mod model;
pub mod sweep;
pub mod simulation;
pub mod report;

pub use model::{LoadModel, ModelConfig, DomainError};
pub use sweep::{SweepConfig, SweepResults, run_sweeps};
pub use simulation::SimConfig;

pub mod prelude {
    pub use crate::model::{LoadModel, ModelConfig, DomainError, compute_load, arg_min_load};
    pub use crate::sweep::{LoadCurve, OptimalSize, SweepConfig, SweepResults, run_sweeps};
    pub use crate::simulation::{SimConfig, SimulationReport, simulate_transmissions};
}
