pub mod config;
pub mod error;

pub use config::ModelConfig;
pub use error::{DomainError, Result};

/// Number of MTU sized fragments a packet counts as. Deliberately not a ceiling:
/// anything at or below the MTU is one fragment, anything above scales linearly.
pub fn fragments(size: f64, mtu: f64) -> f64 {
    (size / mtu).max(1.0)
}

/// Raw load formula, no input checks.
///
/// `loss_rate` is expected in [0, 1] and `size` > 0; outside that the result is
/// still a number but carries no meaning. Use [`LoadModel`] for checked evaluation.
pub fn compute_load(size: f64, loss_rate: f64, mtu: f64, overhead: f64) -> f64 {
    retransmission_penalty(size, loss_rate, mtu) * overhead_factor(size, overhead)
}

/// `2 - P(all fragments arrive)`: 1 with no loss, towards 2 with certain loss.
pub fn retransmission_penalty(size: f64, loss_rate: f64, mtu: f64) -> f64 {
    2.0 - (1.0 - loss_rate).powf(fragments(size, mtu))
}

pub fn overhead_factor(size: f64, overhead: f64) -> f64 {
    1.0 + overhead / size
}

/// Index of the first minimum. NaN never wins.
pub fn arg_min_load(loads: &[f64]) -> Result<usize> {
    if loads.is_empty() {
        return Err(DomainError::EmptySequence);
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, &load) in loads.iter().enumerate() {
        if load.is_nan() {
            continue;
        }
        match best {
            // strict comparison keeps the earliest index on ties
            Some((_, min)) if load >= min => {}
            _ => best = Some((i, load)),
        }
    }

    best.map(|(i, _)| i).ok_or(DomainError::NoMinimum)
}

/// One side of a broadcast evaluation: a single value or a sequence of them.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Scalar(f64),
    Sequence(&'a [f64]),
}

impl Operand<'_> {
    fn len(&self) -> Option<usize> {
        match self {
            Operand::Scalar(_) => None,
            Operand::Sequence(values) => Some(values.len()),
        }
    }

    fn get(&self, i: usize) -> f64 {
        match self {
            Operand::Scalar(value) => *value,
            Operand::Sequence(values) => values[i],
        }
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl<'a> From<&'a [f64]> for Operand<'a> {
    fn from(values: &'a [f64]) -> Self {
        Operand::Sequence(values)
    }
}

impl<'a> From<&'a Vec<f64>> for Operand<'a> {
    fn from(values: &'a Vec<f64>) -> Self {
        Operand::Sequence(values.as_slice())
    }
}

/// Checked evaluation of the load formula against a fixed [`ModelConfig`].
#[derive(Debug, Clone, Copy)]
pub struct LoadModel {
    config: ModelConfig,
}

impl LoadModel {
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn mtu(&self) -> f64 {
        self.config.mtu as f64
    }

    pub fn overhead(&self) -> f64 {
        self.config.overhead as f64
    }

    /// Load of a single packet size at a single loss rate.
    pub fn load_at(&self, size: f64, loss_rate: f64) -> Result<f64> {
        check_size(size)?;
        check_loss_rate(loss_rate)?;
        Ok(compute_load(size, loss_rate, self.mtu(), self.overhead()))
    }

    /// Elementwise load with numpy style broadcasting: a scalar is held constant
    /// against the other side, two sequences are paired and must match in length.
    /// Two scalars give a single element.
    pub fn load<'a>(
        &self,
        sizes: impl Into<Operand<'a>>,
        loss_rates: impl Into<Operand<'a>>,
    ) -> Result<Vec<f64>> {
        let sizes = sizes.into();
        let loss_rates = loss_rates.into();

        let len = match (sizes.len(), loss_rates.len()) {
            (None, None) => 1,
            (Some(n), None) | (None, Some(n)) => n,
            (Some(a), Some(b)) if a == b => a,
            (Some(a), Some(b)) => {
                return Err(DomainError::LengthMismatch {
                    sizes: a,
                    loss_rates: b,
                })
            }
        };

        (0..len)
            .map(|i| self.load_at(sizes.get(i), loss_rates.get(i)))
            .collect()
    }

    /// Size with the lowest load at `loss_rate`, searched over `sizes`.
    pub fn optimal_size(&self, sizes: &[f64], loss_rate: f64) -> Result<(usize, f64)> {
        let loads = self.load(sizes, loss_rate)?;
        let index = arg_min_load(&loads)?;
        Ok((index, loads[index]))
    }
}

fn check_size(size: f64) -> Result<()> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(DomainError::InvalidSize(size))
    }
}

fn check_loss_rate(loss_rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&loss_rate) {
        Ok(())
    } else {
        Err(DomainError::InvalidLossRate(loss_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn model() -> LoadModel {
        LoadModel::new(ModelConfig::default()).unwrap()
    }

    #[test]
    fn single_fragment_at_mtu() {
        let load = model().load_at(1500.0, 0.01).unwrap();
        assert!((load - 1.0908).abs() < EPS, "got {}", load);
    }

    #[test]
    fn two_fragments_at_twice_mtu() {
        let load = model().load_at(3000.0, 0.5).unwrap();
        assert!((load - 1.82).abs() < EPS, "got {}", load);
    }

    #[test]
    fn zero_loss_is_pure_overhead() {
        let m = model();
        for size in [1.0, 99.0, 1500.0, 4000.0, 65534.0] {
            assert_eq!(m.load_at(size, 0.0).unwrap(), 1.0 + 120.0 / size);
        }
    }

    #[test]
    fn fragments_are_not_rounded_up() {
        assert_eq!(fragments(2250.0, 1500.0), 1.5);
        assert_eq!(fragments(10.0, 1500.0), 1.0);
    }

    #[test]
    fn zero_size_is_a_domain_error() {
        assert_eq!(model().load_at(0.0, 0.1), Err(DomainError::InvalidSize(0.0)));
        assert!(matches!(
            model().load(&vec![100.0, 0.0], 0.1),
            Err(DomainError::InvalidSize(_))
        ));
    }

    #[test]
    fn loss_rate_out_of_range_is_rejected() {
        assert_eq!(model().load_at(100.0, 1.5), Err(DomainError::InvalidLossRate(1.5)));
        assert_eq!(model().load_at(100.0, -0.1), Err(DomainError::InvalidLossRate(-0.1)));
        assert!(model().load_at(100.0, f64::NAN).is_err());
    }

    #[test]
    fn raw_formula_does_not_check() {
        // unchecked precondition: still evaluates
        assert!(compute_load(100.0, 1.2, 1500.0, 120.0).is_finite());
    }

    #[test]
    fn broadcasts_scalar_against_sequence() {
        let m = model();
        let sizes = vec![100.0, 1500.0, 3000.0];
        let by_size = m.load(&sizes, 0.5).unwrap();
        assert_eq!(by_size.len(), 3);
        assert!((by_size[2] - 1.82).abs() < EPS);

        let rates = vec![0.0, 0.01];
        let by_rate = m.load(1500.0, &rates).unwrap();
        assert_eq!(by_rate, vec![1.08, m.load_at(1500.0, 0.01).unwrap()]);

        assert_eq!(m.load(1500.0, 0.0).unwrap(), vec![1.08]);
    }

    #[test]
    fn pairs_matching_sequences() {
        let m = model();
        let sizes = vec![1500.0, 3000.0];
        let rates = vec![0.01, 0.5];
        let loads = m.load(&sizes, &rates).unwrap();
        assert!((loads[0] - 1.0908).abs() < EPS);
        assert!((loads[1] - 1.82).abs() < EPS);
    }

    #[test]
    fn mismatched_sequences_fail() {
        let sizes = vec![1500.0, 3000.0];
        let rates = vec![0.01];
        assert_eq!(
            model().load(&sizes, &rates),
            Err(DomainError::LengthMismatch { sizes: 2, loss_rates: 1 })
        );
    }

    #[test]
    fn argmin_interior_minimum() {
        assert_eq!(arg_min_load(&[3.0, 2.0, 1.0, 2.0, 3.0]), Ok(2));
    }

    #[test]
    fn argmin_flat_curve_is_first_index() {
        assert_eq!(arg_min_load(&[1.5; 8]), Ok(0));
    }

    #[test]
    fn argmin_tie_keeps_earliest() {
        assert_eq!(arg_min_load(&[2.0, 1.0, 3.0, 1.0]), Ok(1));
    }

    #[test]
    fn argmin_skips_nan() {
        assert_eq!(arg_min_load(&[f64::NAN, 2.0, 1.0]), Ok(2));
        assert_eq!(arg_min_load(&[f64::NAN]), Err(DomainError::NoMinimum));
        assert_eq!(arg_min_load(&[]), Err(DomainError::EmptySequence));
    }

    #[test]
    fn optimal_size_at_high_loss_is_the_mtu() {
        let sizes: Vec<f64> = (1..65535).map(f64::from).collect();
        let (index, load) = model().optimal_size(&sizes, 0.5).unwrap();
        assert_eq!(sizes[index], 1500.0);
        assert!((load - 1.62).abs() < EPS);
    }

    proptest! {
        #[test]
        fn load_is_at_least_one(size in 1u32..200_000, loss in 0.0f64..=1.0) {
            let load = model().load_at(size as f64, loss).unwrap();
            prop_assert!(load >= 1.0);
        }

        #[test]
        fn load_never_drops_with_more_loss(size in 1u32..200_000, a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let m = model();
            prop_assert!(m.load_at(size as f64, lo).unwrap() <= m.load_at(size as f64, hi).unwrap());
        }

        #[test]
        fn penalty_is_pinned_below_mtu(a in 1u32..=1500, b in 1u32..=1500, loss in 0.0f64..=1.0) {
            prop_assert_eq!(
                retransmission_penalty(a as f64, loss, 1500.0),
                retransmission_penalty(b as f64, loss, 1500.0)
            );
        }
    }
}
