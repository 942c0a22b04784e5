//! Time-bucketed hit counters.
//!
//! Every hit increments one bucket per [`Window`](linkstat_core::Window). A
//! bucket is addressed by the window, the resource identifier and the start
//! of the period the hit fell into, so reading the current count of a window
//! is a single field lookup regardless of how much history exists.

pub mod engine;
pub mod error;

pub use engine::{bucket_start, StatsEngine};
pub use error::{Result, StatsError};
