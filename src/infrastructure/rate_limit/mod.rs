//! Counter backends for the fixed-window rate limiter.
//!
//! - [`RedisCounterStore`] - Shared counters in Redis
//! - [`InMemoryCounterStore`] - Per-process counters

mod memory_counter;
mod redis_counter;
mod store;

pub use memory_counter::InMemoryCounterStore;
pub use redis_counter::RedisCounterStore;
pub use store::CounterStore;

#[cfg(test)]
pub use store::MockCounterStore;
