//! Stream sampling with exact rank queries
//!
//! This module maintains fixed-capacity, uniformly random samples of
//! unbounded streams. Unlike plain reservoir samplers backed by a flat
//! array, these reservoirs index their samples in order-statistics trees,
//! so rank and percentile queries are exact over the current sample and
//! old entries can expire by age.
//!
//! # Example
//!
//! ```
//! use streamgauge::sampling::PercentileReservoir;
//!
//! let mut reservoir = PercentileReservoir::new(512).unwrap();
//!
//! // Stream any number of measurements, keep a uniform sample of 512
//! for i in 0..10_000 {
//!     reservoir.push(f64::from(i % 100));
//! }
//!
//! let p95 = reservoir.percentile(95.0).unwrap();
//! assert!(p95 > 90.0 && p95 < 100.0);
//! ```

mod percentile;
mod reservoir;

pub use percentile::PercentileReservoir;
pub use reservoir::{ReplacementAlgorithm, SamplingReservoir};
