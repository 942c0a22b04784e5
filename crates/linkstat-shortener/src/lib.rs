//! URL shortener service.
//!
//! Ties the identifier codec, the counter store and the stats engine together
//! into the three operations exposed to clients: create, resolve and query
//! hit counts.

pub mod error;
pub mod model;
pub mod service;
pub mod shortener;

pub use error::{Result, ShortenerError};
pub use model::{CreatedUrl, HitCount, Resolution};
pub use service::{ServiceSettings, ShortenerService, DEFAULT_SEQUENCE_SEED};
pub use shortener::Shortener;
