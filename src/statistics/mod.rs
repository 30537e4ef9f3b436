//! Running statistics over a sliding time window
//!
//! This module computes aggregate statistics over the trailing time
//! window of a measurement stream without retaining individual samples:
//! the window is partitioned into fixed-width buckets of partial
//! aggregates that expire wholesale as time advances.
//!
//! # Example
//!
//! ```
//! use streamgauge::statistics::WindowedStats;
//!
//! // Six 10-second buckets covering the trailing minute
//! let mut window = WindowedStats::new(6, 60_000).unwrap();
//!
//! for latency_ms in [12.0, 15.0, 11.0, 14.0] {
//!     window.record(latency_ms);
//! }
//!
//! let stats = window.statistics();
//! assert_eq!(stats.count, 4);
//! assert_eq!(stats.average, Some(13.0));
//! ```

mod windowed;

pub use windowed::{WindowStatistics, WindowedStats};
