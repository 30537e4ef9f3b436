//! Tree-backed uniform reservoir sampling
//!
//! A [`SamplingReservoir`] keeps a fixed-capacity, uniformly random sample
//! of a stream of unknown length. Samples are held in two coordinated
//! order-statistics trees (one ordered by arrival, one by value), so the
//! reservoir answers exact rank queries and can expire entries older than
//! a configured maximum age.
//!
//! Replacement decisions follow Vitter's reservoir algorithms: X computes
//! skip counts by sequential search while the stream is short, hands over
//! permanently to the acceptance-rejection algorithm Z once the stream
//! outgrows `22 * capacity`, and the one-draw-per-arrival algorithm R is
//! available as the exact baseline for validation.
//!
//! # Thread Safety
//!
//! Expired samples are purged lazily on read, so query methods maintain
//! state through a `RefCell`: the type is `Send` but **not `Sync`**. For
//! concurrent access, wrap in `Arc<Mutex<_>>`.
//!
//! # Reference
//!
//! Vitter, J. S. (1985). "Random sampling with a reservoir."
//! ACM Transactions on Mathematical Software 11(1):37-57.

use core::borrow::Borrow;
use core::cell::RefCell;
use core::cmp::Ordering;

use rand::Rng;

#[cfg(any(feature = "std", test))]
use rand::rngs::SmallRng;
#[cfg(any(feature = "std", test))]
use rand::SeedableRng;

use crate::math;
use crate::order::OrderStatTree;
use crate::traits::{Clock, StatsError};

#[cfg(feature = "std")]
use crate::traits::SystemClock;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Streams longer than `capacity * SWITCH_FACTOR` are cheaper under
/// algorithm Z's acceptance-rejection than under X's sequential search
/// (Vitter's recommended crossover).
const SWITCH_FACTOR: u64 = 22;

/// Seed for the default generator; fixed so identically-constructed
/// reservoirs are reproducible.
const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Reservoir replacement algorithm
///
/// `X` is the default and upgrades itself to `Z`; `R` exists as the
/// exact/unbiased ground truth for statistical validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplacementAlgorithm {
    /// One uniform draw per arrival beyond capacity (Vitter's algorithm R).
    /// O(N) draws over the stream; the baseline the optimized algorithms
    /// are validated against.
    R,
    /// Skip-count generation by sequential search (Vitter's algorithm X).
    /// Amortized O(1) per arrival; switches permanently to `Z` once
    /// `total_seen` exceeds `22 * capacity`.
    X,
    /// Skip-count generation by acceptance-rejection with a carried-over
    /// float state (Vitter's algorithm Z). O(log(N/capacity)) expected
    /// draws.
    Z,
}

/// A sample keyed by arrival order
///
/// Ordering and equality consider the arrival index alone; the index is
/// strictly increasing, so keys are unique in the arrival tree.
#[derive(Clone, Debug)]
pub(super) struct ByArrival<T> {
    pub(super) index: u64,
    pub(super) at_millis: u64,
    pub(super) value: T,
}

impl<T> PartialEq for ByArrival<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for ByArrival<T> {}

impl<T> PartialOrd for ByArrival<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ByArrival<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Borrow<u64> for ByArrival<T> {
    fn borrow(&self) -> &u64 {
        &self.index
    }
}

/// A sample keyed by `(value, arrival index)`
///
/// The composite ordering keeps duplicates totally ordered, so rank
/// queries are deterministic even when values tie.
#[derive(Clone, Debug)]
pub(super) struct ByValue<T> {
    pub(super) value: T,
    pub(super) index: u64,
}

impl<T: Ord> PartialEq for ByValue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Ord> Eq for ByValue<T> {}

impl<T: Ord> PartialOrd for ByValue<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for ByValue<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Mutable interior of the reservoir
///
/// Separated from the outer struct so `&self` queries can purge expired
/// samples in place through a `RefCell`.
#[derive(Clone, Debug)]
struct ReservoirInner<T> {
    by_arrival: OrderStatTree<ByArrival<T>>,
    by_value: OrderStatTree<ByValue<T>>,
    /// Items offered since the last full reset, minus expired items
    total_seen: u64,
    /// Next arrival index; strictly increasing for the instance lifetime
    next_index: u64,
    /// Arrivals still to discard before the next replacement
    pending_skip: Option<u64>,
    /// Replacement slot pre-selected by algorithm R's accepting draw
    victim_rank: Option<usize>,
    /// Algorithm Z carry-over state; meaningful only while `active == Z`
    w: f64,
    active: ReplacementAlgorithm,
}

impl<T: Ord + Clone> ReservoirInner<T> {
    /// Drop entries older than `max_age_millis` from both trees
    ///
    /// The replacement math must keep seeing a population that matches
    /// reality, so `total_seen` shrinks with the purge (never below the
    /// live sample count) and any pending skip state is discarded, since
    /// it was computed against the larger population.
    fn purge_expired(&mut self, now_millis: u64, max_age_millis: Option<u64>) {
        let Some(max_age) = max_age_millis else {
            return;
        };
        let mut removed = 0u64;
        loop {
            let expired = match self.by_arrival.min() {
                Some(oldest) if now_millis.saturating_sub(oldest.at_millis) > max_age => {
                    oldest.index
                }
                _ => break,
            };
            let Ok(sample) = self.by_arrival.remove(&expired) else {
                break;
            };
            let _ = self.by_value.remove(&ByValue {
                value: sample.value,
                index: sample.index,
            });
            removed += 1;
        }
        if removed > 0 {
            let live = self.by_value.len() as u64;
            self.total_seen = self.total_seen.saturating_sub(removed).max(live);
            self.pending_skip = None;
            self.victim_rank = None;
        }
    }

    /// Insert a new sample into both trees
    fn admit(&mut self, value: T, now_millis: u64) {
        let index = self.next_index;
        self.next_index += 1;
        self.by_arrival.insert(ByArrival {
            index,
            at_millis: now_millis,
            value: value.clone(),
        });
        self.by_value.insert(ByValue { value, index });
    }

    /// Remove the member at `rank` in value order from both trees
    fn evict_at(&mut self, rank: usize) {
        if let Ok(victim) = self.by_value.remove_at(rank) {
            let _ = self.by_arrival.remove(&victim.index);
        }
    }
}

impl<T> ReservoirInner<T> {
    /// Number of arrivals to discard before the next replacement
    ///
    /// Pure function of `total_seen`, `capacity`, and draws from `rng`,
    /// per the active algorithm. Handles the permanent X→Z handover.
    fn compute_skip<R: Rng>(&mut self, rng: &mut R, capacity: usize) -> u64 {
        if self.active == ReplacementAlgorithm::X
            && self.total_seen > SWITCH_FACTOR * capacity as u64
        {
            self.active = ReplacementAlgorithm::Z;
            self.w = initial_w(rng, capacity);
        }
        match self.active {
            ReplacementAlgorithm::R => self.skip_r(rng, capacity),
            ReplacementAlgorithm::X => skip_x(self.total_seen, capacity, rng),
            ReplacementAlgorithm::Z => self.skip_z(rng, capacity),
        }
    }

    /// Algorithm R: simulate one draw per arrival until acceptance
    ///
    /// The accepting draw is uniform over `[0, capacity)` and doubles as
    /// the victim rank.
    fn skip_r<R: Rng>(&mut self, rng: &mut R, capacity: usize) -> u64 {
        let mut skip = 0u64;
        let mut population = self.total_seen;
        loop {
            population += 1;
            let draw = rng.gen_range(0..population);
            if draw < capacity as u64 {
                self.victim_rank = Some(draw as usize);
                return skip;
            }
            skip += 1;
        }
    }

    /// Algorithm Z: acceptance-rejection skip generation (Vitter §6)
    ///
    /// `w` carries over between calls; a cheap bound is tested first and
    /// the exact `f(S)/cg(X)` product only evaluated when it fails.
    fn skip_z<R: Rng>(&mut self, rng: &mut R, capacity: usize) -> u64 {
        let n = capacity as f64;
        let t = self.total_seen as f64;
        let term = t - n + 1.0;
        loop {
            let u = uniform(rng);
            let x = t * (self.w - 1.0);
            let s = math::floor(x);

            // quick acceptance: U <= h(S)/cg(X)
            let ratio = (t + 1.0) / term;
            let lhs = math::exp(math::ln(u * ratio * ratio * (term + s) / (t + x)) / n);
            let rhs = (t + x) / (term + s) * term / t;
            if lhs <= rhs {
                self.w = rhs / lhs;
                return s as u64;
            }

            // full test: U <= f(S)/cg(X), evaluated as a running product
            let mut y = u * (t + 1.0) / term * (t + s + 1.0) / (t + x);
            let (mut denom, numer_lim) = if n < s {
                (t, term + s)
            } else {
                (t - n + s, t + 1.0)
            };
            let mut numer = t + s;
            while numer >= numer_lim {
                y = y * numer / denom;
                denom -= 1.0;
                numer -= 1.0;
            }

            self.w = initial_w(rng, capacity);
            if math::exp(math::ln(y) / n) <= (t + x) / t {
                return s as u64;
            }
        }
    }
}

/// Algorithm X: sequential search for the minimal skip `S` satisfying
/// `prod_{i=1..=S+1} (t+i-n)/(t+i) <= V` via a multiplicative running
/// quotient (Vitter §4)
fn skip_x<R: Rng>(total_seen: u64, capacity: usize, rng: &mut R) -> u64 {
    let n = capacity as f64;
    let v = uniform(rng);
    let mut skip = 0u64;
    let mut t = (total_seen + 1) as f64;
    let mut quot = (t - n) / t;
    while quot > v {
        skip += 1;
        t += 1.0;
        quot *= (t - n) / t;
    }
    skip
}

/// Uniform draw clamped away from zero so `ln` stays finite
#[inline]
fn uniform<R: Rng>(rng: &mut R) -> f64 {
    rng.gen::<f64>().max(f64::MIN_POSITIVE)
}

/// Fresh algorithm-Z state: `W = exp(-ln(U)/n)`, always > 1
#[inline]
fn initial_w<R: Rng>(rng: &mut R, capacity: usize) -> f64 {
    math::exp(-math::ln(uniform(rng)) / capacity as f64)
}

/// A fixed-capacity, uniformly random sample of a stream
///
/// Every non-expired item ever offered has equal probability of being in
/// the current sample. Items are indexed both by arrival order (driving
/// age-based expiry) and by value (driving rank queries), each in an
/// order-statistics tree.
///
/// The random source `R` and clock `C` are injected at construction; the
/// `std` constructors default them to a seeded [`SmallRng`] and the system
/// clock.
///
/// # Example
///
/// ```
/// use streamgauge::sampling::SamplingReservoir;
///
/// let mut reservoir = SamplingReservoir::new(5).unwrap();
///
/// for i in 0..1_000 {
///     reservoir.push(i);
/// }
///
/// assert_eq!(reservoir.len(), 5);
/// assert_eq!(reservoir.total_seen(), 1_000);
/// ```
#[derive(Clone, Debug)]
pub struct SamplingReservoir<T, R, C> {
    capacity: usize,
    max_age_millis: Option<u64>,
    rng: R,
    clock: C,
    inner: RefCell<ReservoirInner<T>>,
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<T: Ord + Clone> SamplingReservoir<T, SmallRng, SystemClock> {
    /// Create a reservoir holding at most `capacity` samples
    ///
    /// Uses algorithm X (upgrading to Z), a deterministic default seed,
    /// and the system clock. Fails with
    /// [`StatsError::InvalidConfiguration`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, StatsError> {
        Self::with_seed(capacity, DEFAULT_SEED)
    }

    /// Create a reservoir with a caller-chosen RNG seed
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self, StatsError> {
        Self::with_parts(
            capacity,
            None,
            ReplacementAlgorithm::X,
            SmallRng::seed_from_u64(seed),
            SystemClock,
        )
    }

    /// Create a reservoir whose samples expire after `max_age_millis`
    ///
    /// Expired samples are removed lazily on every push and query, and
    /// the replacement math is adjusted as if they had never arrived.
    pub fn with_max_age(capacity: usize, max_age_millis: u64) -> Result<Self, StatsError> {
        Self::with_parts(
            capacity,
            Some(max_age_millis),
            ReplacementAlgorithm::X,
            SmallRng::seed_from_u64(DEFAULT_SEED),
            SystemClock,
        )
    }
}

impl<T: Ord + Clone, R: Rng, C: Clock> SamplingReservoir<T, R, C> {
    /// Create a reservoir with every dependency injected
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of samples held; must be >= 1
    /// * `max_age_millis` - Optional expiry horizon for samples
    /// * `algorithm` - Replacement algorithm; `X` is the usual choice,
    ///   `R` the exact baseline. Passing `Z` starts directly in the
    ///   acceptance-rejection regime.
    /// * `rng` - Random source for replacement decisions
    /// * `clock` - Time source for arrival stamps and expiry
    pub fn with_parts(
        capacity: usize,
        max_age_millis: Option<u64>,
        algorithm: ReplacementAlgorithm,
        mut rng: R,
        clock: C,
    ) -> Result<Self, StatsError> {
        if capacity == 0 {
            return Err(StatsError::InvalidConfiguration {
                parameter: "capacity",
            });
        }
        let w = if algorithm == ReplacementAlgorithm::Z {
            initial_w(&mut rng, capacity)
        } else {
            0.0
        };
        Ok(Self {
            capacity,
            max_age_millis,
            rng,
            clock,
            inner: RefCell::new(ReservoirInner {
                by_arrival: OrderStatTree::new(),
                by_value: OrderStatTree::new(),
                total_seen: 0,
                next_index: 0,
                pending_skip: None,
                victim_rank: None,
                w,
                active: algorithm,
            }),
        })
    }

    /// Offer one item to the reservoir
    ///
    /// Purges expired samples first, then either admits the item directly
    /// (reservoir not yet full) or runs the replacement state machine:
    /// with no skip pending, the active algorithm computes one; a zero
    /// skip evicts one current member (algorithm R's pre-selected victim,
    /// or a uniformly random rank) and admits the item in its place, a
    /// positive skip discards the item. `total_seen` grows either way.
    pub fn push(&mut self, value: T) {
        let now = self.clock.now_millis();
        let Self {
            capacity,
            max_age_millis,
            rng,
            inner,
            ..
        } = self;
        let capacity = *capacity;
        let inner = inner.get_mut();

        inner.purge_expired(now, *max_age_millis);

        if inner.by_value.len() < capacity {
            inner.admit(value, now);
            inner.total_seen += 1;
            return;
        }

        let pending = match inner.pending_skip.take() {
            Some(skip) => skip,
            None => inner.compute_skip(rng, capacity),
        };

        if pending == 0 {
            let rank = match inner.victim_rank.take() {
                Some(rank) => rank,
                None => rng.gen_range(0..capacity),
            };
            inner.evict_at(rank);
            inner.admit(value, now);
        } else {
            inner.pending_skip = Some(pending - 1);
        }
        inner.total_seen += 1;
    }

    /// Offer a batch of items in iteration order
    pub fn push_batch<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.push(value);
        }
    }

    /// Number of samples currently held (expired samples purged first)
    pub fn len(&self) -> usize {
        self.with_inner(|inner| inner.by_value.len())
    }

    /// Check if the reservoir currently holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the reservoir is at capacity
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Maximum number of samples held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Expiry horizon, if one was configured
    pub fn max_age_millis(&self) -> Option<u64> {
        self.max_age_millis
    }

    /// Items offered since the last full reset, net of expired items
    pub fn total_seen(&self) -> u64 {
        self.with_inner(|inner| inner.total_seen)
    }

    /// The replacement algorithm currently driving evictions
    ///
    /// Reports [`ReplacementAlgorithm::Z`] after the permanent X→Z
    /// handover.
    pub fn algorithm(&self) -> ReplacementAlgorithm {
        self.inner.borrow().active
    }

    /// The `rank`-th smallest current sample (0-based)
    pub fn select(&self, rank: usize) -> Result<T, StatsError> {
        self.with_inner(|inner| inner.by_value.at(rank).map(|k| k.value.clone()))
    }

    /// Smallest current sample
    pub fn min(&self) -> Result<T, StatsError> {
        self.with_inner(|inner| {
            inner
                .by_value
                .min()
                .map(|k| k.value.clone())
                .ok_or(StatsError::EmptyReservoir)
        })
    }

    /// Largest current sample
    pub fn max(&self) -> Result<T, StatsError> {
        self.with_inner(|inner| {
            inner
                .by_value
                .max()
                .map(|k| k.value.clone())
                .ok_or(StatsError::EmptyReservoir)
        })
    }

    /// Snapshot of the current samples in ascending value order
    pub fn to_ordered_values(&self) -> Vec<T> {
        self.with_inner(|inner| inner.by_value.iter().map(|k| k.value.clone()).collect())
    }

    /// Discard all samples and reset the counters
    ///
    /// This is the "full reset" that `total_seen` counts from. The X→Z
    /// handover is permanent for the instance lifetime and survives a
    /// clear, as does the monotone arrival index.
    pub fn clear(&mut self) {
        let inner = self.inner.get_mut();
        inner.by_arrival.clear();
        inner.by_value.clear();
        inner.total_seen = 0;
        inner.pending_skip = None;
        inner.victim_rank = None;
    }

    /// Run `f` against purged state under a single borrow
    fn with_inner<U>(&self, f: impl FnOnce(&ReservoirInner<T>) -> U) -> U {
        let mut inner = self.inner.borrow_mut();
        inner.purge_expired(self.clock.now_millis(), self.max_age_millis);
        f(&inner)
    }

    /// Like [`Self::with_inner`], exposing the value-ordered tree to the
    /// percentile specialization
    pub(super) fn with_values<U>(&self, f: impl FnOnce(&OrderStatTree<ByValue<T>>) -> U) -> U {
        self.with_inner(|inner| f(&inner.by_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ManualClock;

    fn fixed<T: Ord + Clone>(
        capacity: usize,
        algorithm: ReplacementAlgorithm,
        seed: u64,
    ) -> SamplingReservoir<T, SmallRng, ManualClock> {
        SamplingReservoir::with_parts(
            capacity,
            None,
            algorithm,
            SmallRng::seed_from_u64(seed),
            ManualClock::new(0),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            SamplingReservoir::<u32, _, _>::new(0).unwrap_err(),
            StatsError::InvalidConfiguration {
                parameter: "capacity"
            }
        );
    }

    #[test]
    fn test_underfilled_keeps_everything() {
        let mut reservoir = fixed::<i32>(10, ReplacementAlgorithm::X, 1);
        reservoir.push_batch([5, 3, 8]);

        assert_eq!(reservoir.len(), 3);
        assert!(!reservoir.is_full());
        assert_eq!(reservoir.to_ordered_values(), vec![3, 5, 8]);
        assert_eq!(reservoir.total_seen(), 3);
    }

    #[test]
    fn test_fill_caps_at_capacity() {
        for algorithm in [ReplacementAlgorithm::R, ReplacementAlgorithm::X] {
            let mut reservoir = fixed::<u32>(7, algorithm, 42);
            for i in 0..500 {
                reservoir.push(i);
            }
            assert_eq!(reservoir.len(), 7);
            assert_eq!(reservoir.total_seen(), 500);
        }
    }

    #[test]
    fn test_reproducible_with_same_seed() {
        let mut a = fixed::<u32>(5, ReplacementAlgorithm::X, 9);
        let mut b = fixed::<u32>(5, ReplacementAlgorithm::X, 9);
        for i in 0..300 {
            a.push(i);
            b.push(i);
        }
        assert_eq!(a.to_ordered_values(), b.to_ordered_values());
    }

    #[test]
    fn test_rank_queries() {
        let mut reservoir = fixed::<i32>(8, ReplacementAlgorithm::X, 3);
        reservoir.push_batch([50, 10, 40, 20, 30]);

        assert_eq!(reservoir.select(0), Ok(10));
        assert_eq!(reservoir.select(4), Ok(50));
        assert_eq!(
            reservoir.select(5),
            Err(StatsError::OutOfRange { rank: 5, len: 5 })
        );
        assert_eq!(reservoir.min(), Ok(10));
        assert_eq!(reservoir.max(), Ok(50));
    }

    #[test]
    fn test_empty_min_max() {
        let reservoir = fixed::<i32>(4, ReplacementAlgorithm::X, 1);
        assert_eq!(reservoir.min(), Err(StatsError::EmptyReservoir));
        assert_eq!(reservoir.max(), Err(StatsError::EmptyReservoir));
    }

    #[test]
    fn test_duplicates_keep_multiplicity() {
        let mut reservoir = fixed::<i32>(6, ReplacementAlgorithm::X, 1);
        reservoir.push_batch([4, 4, 4, 1, 1, 9]);
        assert_eq!(reservoir.to_ordered_values(), vec![1, 1, 4, 4, 4, 9]);
    }

    #[test]
    fn test_switches_to_z_permanently() {
        let capacity = 4;
        let mut reservoir = fixed::<u64>(capacity, ReplacementAlgorithm::X, 11);
        assert_eq!(reservoir.algorithm(), ReplacementAlgorithm::X);

        // well past SWITCH_FACTOR * capacity arrivals
        for i in 0..(SWITCH_FACTOR * capacity as u64 * 4) {
            reservoir.push(i);
        }
        assert_eq!(reservoir.algorithm(), ReplacementAlgorithm::Z);

        // a full reset does not undo the handover
        reservoir.clear();
        assert_eq!(reservoir.len(), 0);
        assert_eq!(reservoir.total_seen(), 0);
        assert_eq!(reservoir.algorithm(), ReplacementAlgorithm::Z);
    }

    #[test]
    fn test_age_eviction_on_push() {
        let clock = ManualClock::new(0);
        let mut reservoir = SamplingReservoir::<u32, _, _>::with_parts(
            10,
            Some(1_000),
            ReplacementAlgorithm::X,
            SmallRng::seed_from_u64(5),
            clock.clone(),
        )
        .unwrap();

        reservoir.push(1);
        clock.advance(600);
        reservoir.push(2);
        clock.advance(600); // first sample now 1200ms old
        reservoir.push(3);

        assert_eq!(reservoir.to_ordered_values(), vec![2, 3]);
    }

    #[test]
    fn test_age_eviction_on_query() {
        let clock = ManualClock::new(0);
        let mut reservoir = SamplingReservoir::<u32, _, _>::with_parts(
            10,
            Some(1_000),
            ReplacementAlgorithm::X,
            SmallRng::seed_from_u64(5),
            clock.clone(),
        )
        .unwrap();

        reservoir.push_batch([1, 2, 3]);
        assert_eq!(reservoir.len(), 3);

        clock.advance(5_000);
        assert_eq!(reservoir.len(), 0);
        assert_eq!(reservoir.min(), Err(StatsError::EmptyReservoir));
    }

    #[test]
    fn test_purge_shrinks_seen_population() {
        let clock = ManualClock::new(0);
        let mut reservoir = SamplingReservoir::<u32, _, _>::with_parts(
            4,
            Some(1_000),
            ReplacementAlgorithm::X,
            SmallRng::seed_from_u64(5),
            clock.clone(),
        )
        .unwrap();

        for i in 0..100 {
            reservoir.push(i);
        }
        assert_eq!(reservoir.total_seen(), 100);

        clock.advance(10_000);
        assert_eq!(reservoir.len(), 0);
        // all four held samples expired; the logical population shrank
        assert_eq!(reservoir.total_seen(), 96);

        // refilling works from the shrunken state
        for i in 0..4 {
            reservoir.push(i);
        }
        assert_eq!(reservoir.len(), 4);
    }

    #[test]
    fn test_arrival_index_monotone_across_clear() {
        let mut reservoir = fixed::<u32>(4, ReplacementAlgorithm::X, 2);
        reservoir.push_batch([1, 2]);
        reservoir.clear();
        reservoir.push_batch([3, 4]);
        assert_eq!(reservoir.inner.borrow().next_index, 4);
    }

    #[test]
    fn test_algorithm_r_uses_preselected_victim() {
        let mut reservoir = fixed::<u32>(2, ReplacementAlgorithm::R, 17);
        for i in 0..50 {
            reservoir.push(i);
        }
        assert_eq!(reservoir.len(), 2);
        assert_eq!(reservoir.algorithm(), ReplacementAlgorithm::R);
        // R never defers to the uniform fallback; any computed victim is
        // consumed together with its zero skip
        let inner = reservoir.inner.borrow();
        assert!(inner.victim_rank.is_none() || inner.pending_skip.is_some());
    }

    #[test]
    fn test_starting_in_z() {
        let mut reservoir = fixed::<u32>(3, ReplacementAlgorithm::Z, 23);
        for i in 0..200 {
            reservoir.push(i);
        }
        assert_eq!(reservoir.len(), 3);
        assert_eq!(reservoir.algorithm(), ReplacementAlgorithm::Z);
    }
}
