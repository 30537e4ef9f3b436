//! Clock injection and error types shared across the crate
//!
//! Every component that reasons about time takes a [`Clock`] at
//! construction instead of reading a process-wide source, so tests can
//! drive expiry and window rolling deterministically with a
//! [`ManualClock`]. Errors are surfaced synchronously through
//! [`StatsError`]; none of them are fatal and nothing is retried
//! internally.

use core::cell::Cell;

use thiserror::Error;

#[cfg(feature = "std")]
use std::rc::Rc;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::rc::Rc;

/// Error type for all fallible operations in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    /// A constructor argument was non-positive (capacity, bucket count,
    /// window duration, or a window too short for its bucket count)
    #[error("invalid configuration: {parameter} must be positive")]
    InvalidConfiguration {
        /// Name of the offending constructor parameter
        parameter: &'static str,
    },

    /// A percentile/min/max query ran against zero current samples
    #[error("reservoir holds no samples")]
    EmptyReservoir,

    /// A rank query fell outside `[0, len)`
    #[error("rank {rank} out of range for {len} elements")]
    OutOfRange {
        /// The requested 0-based rank
        rank: usize,
        /// Number of elements present at query time
        len: usize,
    },

    /// A removal targeted a key that is not in the tree
    #[error("key not found")]
    NotFound,
}

/// A millisecond-resolution time source
///
/// Implementations must be monotonically non-decreasing for eviction and
/// window-rolling arithmetic to hold; regressions are tolerated via
/// saturating arithmetic but produce no useful expiry behavior.
pub trait Clock {
    /// Current time in milliseconds
    ///
    /// The epoch is irrelevant; only differences are ever computed.
    fn now_millis(&self) -> u64;
}

/// Wall-clock time from [`std::time::SystemTime`]
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A manually-driven clock for deterministic tests and `no_std` callers
///
/// Clones share the same underlying instant, so a test can hand one clone
/// to a reservoir and keep another to advance time:
///
/// ```rust
/// use streamgauge::traits::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// let held = clock.clone();
///
/// clock.advance(500);
/// assert_eq!(held.now_millis(), 1_500);
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Create a clock reading `start_millis`
    pub fn new(start_millis: u64) -> Self {
        Self {
            millis: Rc::new(Cell::new(start_millis)),
        }
    }

    /// Move the clock forward by `delta_millis`
    pub fn advance(&self, delta_millis: u64) {
        self.millis.set(self.millis.get() + delta_millis);
    }

    /// Set the clock to an absolute instant
    pub fn set(&self, millis: u64) {
        self.millis.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(0);
        let other = clock.clone();

        clock.advance(250);
        other.advance(250);

        assert_eq!(clock.now_millis(), 500);
        assert_eq!(other.now_millis(), 500);
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::new(10);
        clock.set(5);
        assert_eq!(clock.now_millis(), 5);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_system_clock_nonzero() {
        assert!(SystemClock.now_millis() > 0);
    }

    #[test]
    fn test_error_display() {
        let err = StatsError::OutOfRange { rank: 9, len: 3 };
        assert_eq!(err.to_string(), "rank 9 out of range for 3 elements");
    }
}
