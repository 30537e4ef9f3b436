//! Percentile queries over a numeric sampling reservoir
//!
//! [`PercentileReservoir`] is the `f64` specialization of
//! [`SamplingReservoir`], keying the value-ordered tree with
//! [`OrderedFloat`] so floats get the total order the tree requires, and
//! deriving percentiles by linear interpolation between adjacent ranks.

use ordered_float::OrderedFloat;
use rand::Rng;

#[cfg(any(feature = "std", test))]
use rand::rngs::SmallRng;

use super::reservoir::{ReplacementAlgorithm, SamplingReservoir};
use crate::math;
use crate::traits::{Clock, StatsError};

#[cfg(feature = "std")]
use crate::traits::SystemClock;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// A fixed-capacity uniform sample of numeric measurements with
/// linearly-interpolated percentile queries
///
/// Holds at most `capacity` measurements chosen uniformly at random from
/// everything pushed (optionally expiring by age), and computes any
/// percentile exactly over the current sample. NaN measurements are
/// ignored to keep the ordering meaningful.
///
/// # Example
///
/// ```
/// use streamgauge::sampling::PercentileReservoir;
///
/// let mut reservoir = PercentileReservoir::new(16).unwrap();
/// reservoir.push_batch([1.0, 2.0, 3.0, 4.0, 5.0]);
///
/// assert_eq!(reservoir.percentile(50.0), Ok(3.0));
/// assert_eq!(reservoir.percentile(0.0), Ok(1.0));
/// assert_eq!(reservoir.percentile(100.0), Ok(5.0));
/// ```
#[derive(Clone, Debug)]
pub struct PercentileReservoir<R, C> {
    inner: SamplingReservoir<OrderedFloat<f64>, R, C>,
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl PercentileReservoir<SmallRng, SystemClock> {
    /// Create a reservoir holding at most `capacity` measurements
    pub fn new(capacity: usize) -> Result<Self, StatsError> {
        SamplingReservoir::new(capacity).map(|inner| Self { inner })
    }

    /// Create a reservoir with a caller-chosen RNG seed
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self, StatsError> {
        SamplingReservoir::with_seed(capacity, seed).map(|inner| Self { inner })
    }

    /// Create a reservoir whose measurements expire after `max_age_millis`
    pub fn with_max_age(capacity: usize, max_age_millis: u64) -> Result<Self, StatsError> {
        SamplingReservoir::with_max_age(capacity, max_age_millis).map(|inner| Self { inner })
    }
}

impl<R: Rng, C: Clock> PercentileReservoir<R, C> {
    /// Create a reservoir with every dependency injected
    ///
    /// See [`SamplingReservoir::with_parts`] for the argument contract.
    pub fn with_parts(
        capacity: usize,
        max_age_millis: Option<u64>,
        algorithm: ReplacementAlgorithm,
        rng: R,
        clock: C,
    ) -> Result<Self, StatsError> {
        SamplingReservoir::with_parts(capacity, max_age_millis, algorithm, rng, clock)
            .map(|inner| Self { inner })
    }

    /// Offer one measurement; NaN is ignored
    pub fn push(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.inner.push(OrderedFloat(value));
    }

    /// Offer a batch of measurements in iteration order
    pub fn push_batch<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = f64>,
    {
        for value in values {
            self.push(value);
        }
    }

    /// Percentile of the current sample, linearly interpolated
    ///
    /// `p` is clamped into `[0, 100]` (NaN is treated as 0). With `n`
    /// samples, the query interpolates between the values at ranks
    /// `floor((n-1) * p/100)` and `ceil((n-1) * p/100)`; `p = 0` returns
    /// the minimum and `p = 100` the maximum. Expired measurements are
    /// purged first; fails with [`StatsError::EmptyReservoir`] when
    /// nothing remains.
    pub fn percentile(&self, p: f64) -> Result<f64, StatsError> {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
        self.inner.with_values(|tree| {
            let n = tree.len();
            if n == 0 {
                return Err(StatsError::EmptyReservoir);
            }
            let index = (n - 1) as f64 * p / 100.0;
            let lo = math::floor(index) as usize;
            let hi = math::ceil(index) as usize;
            let lo_value = tree.at(lo)?.value.into_inner();
            if hi == lo {
                return Ok(lo_value);
            }
            let hi_value = tree.at(hi)?.value.into_inner();
            Ok(lo_value + (index - lo as f64) * (hi_value - lo_value))
        })
    }

    /// Several percentiles of the current sample
    pub fn percentiles(&self, ps: &[f64]) -> Result<Vec<f64>, StatsError> {
        ps.iter().map(|&p| self.percentile(p)).collect()
    }

    /// The 50th percentile
    pub fn median(&self) -> Result<f64, StatsError> {
        self.percentile(50.0)
    }

    /// Smallest current measurement
    pub fn min(&self) -> Result<f64, StatsError> {
        self.inner.min().map(OrderedFloat::into_inner)
    }

    /// Largest current measurement
    pub fn max(&self) -> Result<f64, StatsError> {
        self.inner.max().map(OrderedFloat::into_inner)
    }

    /// Number of measurements currently held (expired ones purged first)
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the reservoir currently holds no measurements
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Maximum number of measurements held
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Measurements offered since the last full reset, net of expiry
    pub fn total_seen(&self) -> u64 {
        self.inner.total_seen()
    }

    /// The replacement algorithm currently driving evictions
    pub fn algorithm(&self) -> ReplacementAlgorithm {
        self.inner.algorithm()
    }

    /// Snapshot of the current measurements in ascending order
    pub fn to_ordered_values(&self) -> Vec<f64> {
        self.inner.with_values(|tree| {
            tree.iter().map(|k| k.value.into_inner()).collect()
        })
    }

    /// Discard all measurements and reset the counters
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ManualClock;
    use rand::SeedableRng;

    fn filled(values: &[f64]) -> PercentileReservoir<SmallRng, ManualClock> {
        let mut reservoir = PercentileReservoir::with_parts(
            64,
            None,
            ReplacementAlgorithm::X,
            SmallRng::seed_from_u64(1),
            ManualClock::new(0),
        )
        .unwrap();
        reservoir.push_batch(values.iter().copied());
        reservoir
    }

    #[test]
    fn test_known_percentiles() {
        let reservoir = filled(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(reservoir.percentile(0.0), Ok(1.0));
        assert_eq!(reservoir.percentile(50.0), Ok(3.0));
        assert_eq!(reservoir.percentile(75.0), Ok(4.0));
        assert_eq!(reservoir.percentile(100.0), Ok(5.0));
    }

    #[test]
    fn test_interpolated_percentile() {
        let reservoir = filled(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        // index = 4 * 0.7513 = 3.0052, between ranks 3 and 4
        let p = reservoir.percentile(75.13).unwrap();
        assert!((p - 4.0052).abs() < 1e-9, "got {}", p);
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let a = filled(&[5.0, 1.0, 4.0, 2.0, 3.0]);
        let b = filled(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(a.percentile(50.0), b.percentile(50.0));
        assert_eq!(a.to_ordered_values(), b.to_ordered_values());
    }

    #[test]
    fn test_empty_fails() {
        let reservoir = filled(&[]);
        assert_eq!(reservoir.percentile(50.0), Err(StatsError::EmptyReservoir));
        assert_eq!(reservoir.min(), Err(StatsError::EmptyReservoir));
        assert_eq!(reservoir.max(), Err(StatsError::EmptyReservoir));
    }

    #[test]
    fn test_single_sample() {
        let reservoir = filled(&[42.0]);
        for p in [0.0, 37.5, 50.0, 100.0] {
            assert_eq!(reservoir.percentile(p), Ok(42.0));
        }
    }

    #[test]
    fn test_out_of_range_p_clamped() {
        let reservoir = filled(&[1.0, 2.0, 3.0]);
        assert_eq!(reservoir.percentile(-10.0), Ok(1.0));
        assert_eq!(reservoir.percentile(250.0), Ok(3.0));
        assert_eq!(reservoir.percentile(f64::NAN), Ok(1.0));
    }

    #[test]
    fn test_nan_measurements_ignored() {
        let reservoir = filled(&[1.0, f64::NAN, 3.0]);
        assert_eq!(reservoir.len(), 2);
        assert_eq!(reservoir.median(), Ok(2.0));
    }

    #[test]
    fn test_duplicate_values() {
        let reservoir = filled(&[2.0, 2.0, 2.0, 8.0]);
        assert_eq!(reservoir.percentile(25.0), Ok(2.0));
        assert_eq!(reservoir.max(), Ok(8.0));
    }

    #[test]
    fn test_percentiles_batch() {
        let reservoir = filled(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            reservoir.percentiles(&[0.0, 50.0, 100.0]),
            Ok(vec![1.0, 3.0, 5.0])
        );
    }

    #[test]
    fn test_expiry_visible_to_percentile() {
        let clock = ManualClock::new(0);
        let mut reservoir = PercentileReservoir::with_parts(
            8,
            Some(1_000),
            ReplacementAlgorithm::X,
            SmallRng::seed_from_u64(3),
            clock.clone(),
        )
        .unwrap();

        reservoir.push_batch([10.0, 20.0]);
        clock.advance(1_500);
        reservoir.push(30.0);

        // the first two measurements aged out
        assert_eq!(reservoir.len(), 1);
        assert_eq!(reservoir.percentile(50.0), Ok(30.0));
    }

    #[test]
    fn test_median_convenience() {
        let reservoir = filled(&[1.0, 3.0, 5.0]);
        assert_eq!(reservoir.median(), Ok(3.0));
    }
}
