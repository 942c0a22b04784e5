//! [`CounterStore`](linkstat_core::CounterStore) backends.

pub mod memory;
pub mod redis;

pub use self::memory::InMemoryCounterStore;
pub use self::redis::RedisCounterStore;
