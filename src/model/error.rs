use thiserror::Error;

/// Invalid numeric input to the load model. Every variant is fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("packet size must be a finite value > 0, got {0}")]
    InvalidSize(f64),

    #[error("mtu must be > 0")]
    InvalidMtu,

    #[error("max size must be at least 2 to sweep any size, got {0}")]
    InvalidMaxSize(u32),

    #[error("loss rate must lie in [0, 1], got {0}")]
    InvalidLossRate(f64),

    #[error("cannot pair sequences of length {sizes} (sizes) and {loss_rates} (loss rates)")]
    LengthMismatch { sizes: usize, loss_rates: usize },

    #[error("empty load sequence has no minimum")]
    EmptySequence,

    #[error("load sequence contains no comparable value")]
    NoMinimum,

    #[error("simulation needs at least one trial")]
    InvalidTrials,
}

pub type Result<T> = std::result::Result<T, DomainError>;
