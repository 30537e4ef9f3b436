//! Bucketed sliding-window accumulator
//!
//! [`WindowedStats`] folds measurements into a circular array of
//! fixed-duration time buckets plus one open "intermediary" bucket for the
//! interval currently in progress. Each bucket holds only partial
//! aggregates (count, sum, sum of squares, min, max), so memory is
//! O(bucket_count) regardless of traffic, and a whole bucket of
//! measurements expires at once as the window slides.
//!
//! Evicting the bucket that held the window's minimum or maximum triggers
//! an O(bucket_count) rescan of the remaining buckets. That is the right
//! trade for the tens of buckets this type is built for; it is not meant
//! for windows with thousands of buckets.
//!
//! Like the reservoirs, expiry is lazy: both `record` and `statistics`
//! first roll the window forward to the injected clock's present. Queries
//! therefore maintain state through a `RefCell`; the type is `Send` but
//! **not `Sync`**.

use core::cell::RefCell;
use core::mem;

use crate::math;
use crate::traits::{Clock, StatsError};

#[cfg(feature = "std")]
use crate::traits::SystemClock;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Partial aggregates of one bucket interval (or of the whole window)
#[derive(Clone, Copy, Debug)]
struct Bucket {
    count: u64,
    sum: f64,
    sum_squares: f64,
    min: f64,
    max: f64,
}

impl Bucket {
    const EMPTY: Self = Self {
        count: 0,
        sum: 0.0,
        sum_squares: 0.0,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_squares += value * value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }
}

/// Mutable interior, behind a `RefCell` so `&self` queries can roll the
/// window forward in place
#[derive(Clone, Debug)]
struct WindowInner {
    buckets: Vec<Bucket>,
    /// Slot holding the oldest flushed interval; overwritten next
    oldest: usize,
    /// End of the last flushed interval
    queue_end_millis: u64,
    /// Aggregates of the interval currently in progress
    open: Bucket,
    /// Running totals over all buckets plus `open`
    totals: Bucket,
}

impl WindowInner {
    /// Advance the window to cover `now_millis`
    ///
    /// Every whole interval elapsed since `queue_end_millis` promotes the
    /// open bucket into the oldest slot (evicting that slot's aggregate
    /// from the totals) and starts a fresh open bucket. When more
    /// intervals elapsed than there are buckets, everything is stale and
    /// the window clears in one step, keeping the bucket grid aligned.
    fn roll(&mut self, now_millis: u64, interval_millis: u64) {
        let elapsed = now_millis.saturating_sub(self.queue_end_millis);
        let steps = elapsed / interval_millis;
        if steps == 0 {
            return;
        }
        if steps > self.buckets.len() as u64 {
            for bucket in &mut self.buckets {
                *bucket = Bucket::EMPTY;
            }
            self.open = Bucket::EMPTY;
            self.totals = Bucket::EMPTY;
            self.queue_end_millis += steps * interval_millis;
            return;
        }
        for _ in 0..steps {
            let slot = self.oldest;
            let closed = mem::replace(&mut self.open, Bucket::EMPTY);
            let evicted = mem::replace(&mut self.buckets[slot], closed);
            self.evict(evicted);
            self.oldest = (slot + 1) % self.buckets.len();
            self.queue_end_millis += interval_millis;
        }
    }

    /// Remove one bucket's aggregates from the running totals
    fn evict(&mut self, bucket: Bucket) {
        if bucket.count == 0 {
            return;
        }
        self.totals.count -= bucket.count;
        self.totals.sum -= bucket.sum;
        self.totals.sum_squares -= bucket.sum_squares;
        if self.totals.count == 0 {
            // also drops accumulated floating-point residue
            self.totals = Bucket::EMPTY;
        } else if bucket.min <= self.totals.min || bucket.max >= self.totals.max {
            self.rescan_extremes();
        }
    }

    /// Recompute the window min/max from every live bucket and the open
    /// intermediary; O(bucket_count)
    fn rescan_extremes(&mut self) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for bucket in self.buckets.iter().chain(core::iter::once(&self.open)) {
            if bucket.count == 0 {
                continue;
            }
            min = min.min(bucket.min);
            max = max.max(bucket.max);
        }
        self.totals.min = min;
        self.totals.max = max;
    }
}

/// Aggregate statistics over the current window
///
/// Fields are absent rather than zero or NaN when undefined: `min`, `max`,
/// and `average` require at least one measurement, the deviation metrics
/// at least two.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowStatistics {
    /// Measurements currently inside the window
    pub count: u64,
    /// Sum of those measurements (0.0 when empty)
    pub sum: f64,
    /// Smallest measurement in the window
    pub min: Option<f64>,
    /// Largest measurement in the window
    pub max: Option<f64>,
    /// Arithmetic mean, `sum / count`
    pub average: Option<f64>,
    /// Mean-square deviation (population): `sqrt((Σx² - (Σx)²/n) / n)`
    pub msdev: Option<f64>,
    /// Sample standard deviation: `sqrt((Σx² - (Σx)²/n) / (n-1))`
    pub stddev: Option<f64>,
}

impl WindowStatistics {
    fn from_totals(totals: &Bucket) -> Self {
        let count = totals.count;
        let present = count > 0;
        let (msdev, stddev) = if count >= 2 {
            let n = count as f64;
            // clamp the moment at zero against floating-point drift
            let moment = (totals.sum_squares - totals.sum * totals.sum / n).max(0.0);
            (
                Some(math::sqrt(moment / n)),
                Some(math::sqrt(moment / (n - 1.0))),
            )
        } else {
            (None, None)
        };
        Self {
            count,
            sum: totals.sum,
            min: present.then_some(totals.min),
            max: present.then_some(totals.max),
            average: present.then(|| totals.sum / count as f64),
            msdev,
            stddev,
        }
    }
}

/// Running statistics over a sliding time window
///
/// Measurements are folded into `bucket_count` fixed-width time buckets
/// spanning `window_millis`; as the injected clock advances, whole buckets
/// fall out of the window and the running totals shed their contribution.
/// Individual measurements are never retained.
///
/// # Example
///
/// ```
/// use streamgauge::statistics::WindowedStats;
///
/// let mut window = WindowedStats::new(10, 60_000).unwrap();
/// window.record(5.0);
/// window.record(7.0);
///
/// let stats = window.statistics();
/// assert_eq!(stats.count, 2);
/// assert_eq!(stats.sum, 12.0);
/// assert_eq!(stats.min, Some(5.0));
/// assert_eq!(stats.max, Some(7.0));
/// ```
#[derive(Clone, Debug)]
pub struct WindowedStats<C> {
    interval_millis: u64,
    window_millis: u64,
    clock: C,
    inner: RefCell<WindowInner>,
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl WindowedStats<SystemClock> {
    /// Create a window of `bucket_count` buckets spanning `window_millis`,
    /// driven by the system clock
    ///
    /// Fails with [`StatsError::InvalidConfiguration`] when either
    /// argument is zero or the window is shorter than the bucket count
    /// (which would make the bucket interval zero).
    pub fn new(bucket_count: usize, window_millis: u64) -> Result<Self, StatsError> {
        Self::with_clock(bucket_count, window_millis, SystemClock)
    }
}

impl<C: Clock> WindowedStats<C> {
    /// Create a window driven by an injected clock
    pub fn with_clock(bucket_count: usize, window_millis: u64, clock: C) -> Result<Self, StatsError> {
        if bucket_count == 0 {
            return Err(StatsError::InvalidConfiguration {
                parameter: "bucket_count",
            });
        }
        if window_millis == 0 {
            return Err(StatsError::InvalidConfiguration {
                parameter: "window_millis",
            });
        }
        let interval_millis = window_millis / bucket_count as u64;
        if interval_millis == 0 {
            return Err(StatsError::InvalidConfiguration {
                parameter: "bucket_interval",
            });
        }
        let queue_end_millis = clock.now_millis();
        Ok(Self {
            interval_millis,
            window_millis,
            clock,
            inner: RefCell::new(WindowInner {
                buckets: vec![Bucket::EMPTY; bucket_count],
                oldest: 0,
                queue_end_millis,
                open: Bucket::EMPTY,
                totals: Bucket::EMPTY,
            }),
        })
    }

    /// Fold one measurement into the window
    ///
    /// Rolls the window forward first, then adds the value to the open
    /// bucket and the running totals. NaN is ignored.
    pub fn record(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        let now = self.clock.now_millis();
        let interval = self.interval_millis;
        let inner = self.inner.get_mut();
        inner.roll(now, interval);
        inner.open.add(value);
        inner.totals.add(value);
    }

    /// Aggregate statistics over the current window
    ///
    /// Rolls the window forward first, so measurements older than the
    /// window never contribute even when nothing was recorded since.
    pub fn statistics(&self) -> WindowStatistics {
        let mut inner = self.inner.borrow_mut();
        inner.roll(self.clock.now_millis(), self.interval_millis);
        WindowStatistics::from_totals(&inner.totals)
    }

    /// Measurements currently inside the window
    pub fn count(&self) -> u64 {
        self.statistics().count
    }

    /// Number of buckets the window is divided into
    pub fn bucket_count(&self) -> usize {
        self.inner.borrow().buckets.len()
    }

    /// Width of the whole window in milliseconds
    pub fn window_millis(&self) -> u64 {
        self.window_millis
    }

    /// Width of one bucket in milliseconds
    pub fn interval_millis(&self) -> u64 {
        self.interval_millis
    }

    /// Drop every measurement and restart the window at the present
    pub fn clear(&mut self) {
        let now = self.clock.now_millis();
        let inner = self.inner.get_mut();
        for bucket in &mut inner.buckets {
            *bucket = Bucket::EMPTY;
        }
        inner.open = Bucket::EMPTY;
        inner.totals = Bucket::EMPTY;
        inner.oldest = 0;
        inner.queue_end_millis = now;
    }
}
