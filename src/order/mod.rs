//! Order-statistics containers
//!
//! This module provides ordered containers augmented with subtree weights,
//! answering rank and selection queries in O(log n) alongside ordinary
//! insertion and removal.
//!
//! # Example
//!
//! ```
//! use streamgauge::order::OrderStatTree;
//!
//! let mut tree = OrderStatTree::new();
//! for v in [30, 10, 20, 20, 40] {
//!     tree.insert(v);
//! }
//!
//! assert_eq!(tree.at(0), Ok(&10));      // smallest
//! assert_eq!(tree.lower_bound(&20), 1); // elements < 20
//! assert_eq!(tree.count(&20), 2);       // multiset semantics
//! ```

mod tree;

pub use tree::{Iter, OrderStatTree};
