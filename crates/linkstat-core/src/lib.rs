//! Core types and traits for the linkstat URL shortener.
//!
//! This crate provides the types shared by the stats engine, the shortener
//! service and the storage backends: short codes, counting windows, the clock
//! abstraction, the persisted key layout and the [`CounterStore`] contract.

pub mod clock;
pub mod error;
pub mod keys;
pub mod shortcode;
pub mod store;
pub mod window;

#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use error::{Result, StoreError, UnknownWindow};
pub use shortcode::ShortCode;
pub use store::CounterStore;
pub use window::Window;
