//! # Streamgauge
//!
//! Online statistical summarization for measurement streams.
//!
//! Streamgauge maintains bounded-memory summaries of unbounded scalar
//! streams (observed latencies, queue depths, spreads, ...) and answers
//! exact rank and running-aggregate queries over them:
//!
//! - **Sampling Reservoir**: a fixed-capacity, uniformly random sample of
//!   the stream with optional time-based expiry, backed by order-statistics
//!   trees for O(log n) rank queries
//! - **Percentile Reservoir**: the numeric specialization with
//!   linearly-interpolated percentiles
//! - **Windowed Stats**: a sliding time window of bucketed aggregates
//!   producing count/sum/min/max/mean/deviation without retaining samples
//! - **Order-Statistics Tree**: the underlying AVL multiset with subtree
//!   weights, usable on its own
//!
//! ## Quick Start
//!
//! ```rust
//! use streamgauge::prelude::*;
//!
//! // Keep a 100-sample uniform reservoir of observed latencies
//! let mut latencies = PercentileReservoir::new(100).unwrap();
//! for ms in [12.0, 14.5, 9.0, 220.0, 13.1] {
//!     latencies.push(ms);
//! }
//! println!("p99: {:.1}ms", latencies.percentile(99.0).unwrap());
//! ```
//!
//! ## Windowed aggregates
//!
//! ```rust
//! use streamgauge::statistics::WindowedStats;
//!
//! // Ten 6-second buckets covering the trailing minute
//! let mut window = WindowedStats::new(10, 60_000).unwrap();
//! window.record(41.0);
//! window.record(43.0);
//!
//! let stats = window.statistics();
//! assert_eq!(stats.count, 2);
//! assert_eq!(stats.average, Some(42.0));
//! ```
//!
//! ## Determinism
//!
//! The random source and the clock are injected at construction, never read
//! from process-wide globals. Tests substitute a seeded [`rand`] generator
//! and a [`ManualClock`](traits::ManualClock):
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use streamgauge::sampling::{ReplacementAlgorithm, SamplingReservoir};
//! use streamgauge::traits::ManualClock;
//!
//! let clock = ManualClock::new(0);
//! let rng = SmallRng::seed_from_u64(7);
//! let mut reservoir = SamplingReservoir::<u32, _, _>::with_parts(
//!     8,
//!     Some(1_000),
//!     ReplacementAlgorithm::X,
//!     rng,
//!     clock.clone(),
//! )
//! .unwrap();
//!
//! reservoir.push(5);
//! clock.advance(2_000); // first sample ages out
//! reservoir.push(6);
//! assert_eq!(reservoir.len(), 1);
//! ```
//!
//! ## Feature Flags
//!
//! Algorithm families (pick what you need):
//! - `sampling` (default): reservoirs and percentile queries
//! - `statistics` (default): windowed running statistics
//! - `full`: enable all algorithm families
//!
//! Platform features:
//! - `std` (default): standard library support (system clock, default RNG)
//! - `serde`: serialization of statistics snapshots
//!
//! ## Concurrency
//!
//! Every operation is synchronous and runs to completion; there is no
//! internal locking. Reservoirs purge expired samples lazily on read, so
//! query methods use interior mutability and the types are `Send` but not
//! `Sync`; wrap in a mutex to share across threads.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Cross-cutting pieces always available
pub(crate) mod math;
pub mod order;
pub mod traits;

#[cfg(feature = "sampling")]
#[cfg_attr(docsrs, doc(cfg(feature = "sampling")))]
pub mod sampling;

#[cfg(feature = "statistics")]
#[cfg_attr(docsrs, doc(cfg(feature = "statistics")))]
pub mod statistics;

pub mod prelude {
    pub use crate::order::OrderStatTree;
    pub use crate::traits::{Clock, ManualClock, StatsError};

    #[cfg(feature = "std")]
    pub use crate::traits::SystemClock;

    #[cfg(feature = "sampling")]
    pub use crate::sampling::{PercentileReservoir, ReplacementAlgorithm, SamplingReservoir};

    #[cfg(feature = "statistics")]
    pub use crate::statistics::{WindowStatistics, WindowedStats};
}

pub use order::OrderStatTree;
pub use traits::StatsError;

#[cfg(feature = "sampling")]
pub use sampling::{PercentileReservoir, SamplingReservoir};

#[cfg(feature = "statistics")]
pub use statistics::WindowedStats;
