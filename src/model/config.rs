use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Link constants the load model is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Largest size in bytes the link carries without fragmenting.
    pub mtu: u32,
    /// Fixed per-packet header cost in bytes.
    pub overhead: u32,
    /// Exclusive upper bound of the size sweep.
    pub max_size: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            mtu: 1500,
            overhead: 120,
            max_size: 65535,
        }
    }
}

impl ModelConfig {
    pub fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = mtu;
        self
    }

    pub fn with_overhead(mut self, overhead: u32) -> Self {
        self.overhead = overhead;
        self
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    // overhead is unsigned, so the only thing left to check is the mtu and sweep bound
    pub fn validate(&self) -> Result<()> {
        if self.mtu == 0 {
            return Err(DomainError::InvalidMtu);
        }
        if self.max_size < 2 {
            return Err(DomainError::InvalidMaxSize(self.max_size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_link() {
        let config = ModelConfig::default();
        assert_eq!(config.mtu, 1500);
        assert_eq!(config.overhead, 120);
        assert_eq!(config.max_size, 65535);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_mtu_is_rejected() {
        let config = ModelConfig::default().with_mtu(0);
        assert_eq!(config.validate(), Err(DomainError::InvalidMtu));
    }

    #[test]
    fn sweep_bound_needs_one_size() {
        assert_eq!(
            ModelConfig::default().with_max_size(1).validate(),
            Err(DomainError::InvalidMaxSize(1))
        );
        assert!(ModelConfig::default().with_max_size(2).validate().is_ok());
    }

    #[test]
    fn zero_overhead_is_allowed() {
        assert!(ModelConfig::default().with_overhead(0).validate().is_ok());
    }
}
