//! In-memory response cache with time-based expiry
//!
//! Stores raw response bodies keyed by request URL. A background reaper task
//! periodically evicts entries older than the configured maximum age, so the
//! cache never grows past the set of URLs visited within one expiry window.

mod manager;

pub use manager::{Cache, CacheConfig};
