//! Time-bounded byte cache with a cancellable background reaper
//!
//! All access to the entry map goes through a single `parking_lot::Mutex`.
//! Reads never refresh an entry's age: expiry is measured from insertion only.

use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// A stored payload and the instant it was inserted
#[derive(Debug, Clone)]
struct CacheEntry {
    /// When the entry was added; reset by every `add` for the same key
    created_at: Instant,
    /// The raw response body
    payload: Bytes,
}

type EntryMap = Arc<Mutex<HashMap<String, CacheEntry>>>;

/// Timing configuration for a [`Cache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How often the reaper wakes up to scan for stale entries
    pub reap_interval: Duration,
    /// Entries strictly older than this are removed on the next scan
    pub max_age: Duration,
}

impl CacheConfig {
    /// Uses one interval as both the reap period and the maximum age
    pub fn uniform(interval: Duration) -> Self {
        Self {
            reap_interval: interval,
            max_age: interval,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::uniform(Duration::from_secs(300)) // 5 minutes
    }
}

/// Concurrency-safe cache mapping request keys to response bodies
///
/// Creating a cache spawns its reaper on the current Tokio runtime. The reaper
/// stops when [`Cache::shutdown`] is awaited or when the cache is dropped.
#[derive(Debug)]
pub struct Cache {
    entries: EntryMap,
    config: CacheConfig,
    shutdown_tx: mpsc::Sender<()>,
    reaper: Option<JoinHandle<()>>,
}

impl Cache {
    /// Creates a cache whose reap period and maximum age are both `interval`
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime, or if `interval` is zero.
    pub fn new(interval: Duration) -> Self {
        Self::with_config(CacheConfig::uniform(interval))
    }

    /// Creates a cache with independent reap period and maximum age
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime, or if `reap_interval` is zero.
    pub fn with_config(config: CacheConfig) -> Self {
        debug!(
            reap_interval = ?config.reap_interval,
            max_age = ?config.max_age,
            "Creating response cache"
        );

        let entries: EntryMap = Arc::new(Mutex::new(HashMap::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let reaper = tokio::spawn(reap_loop(entries.clone(), config, shutdown_rx));

        Self {
            entries,
            config,
            shutdown_tx,
            reaper: Some(reaper),
        }
    }

    /// Returns the timing configuration this cache was built with
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Inserts or overwrites the entry for `key`, starting a fresh expiry window
    pub fn add(&self, key: impl Into<String>, payload: Bytes) {
        let key = key.into();
        let entry = CacheEntry {
            created_at: Instant::now(),
            payload,
        };
        self.entries.lock().insert(key, entry);
    }

    /// Returns the payload stored under `key`, or `None` if absent or reaped
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.entries
            .lock()
            .get(key)
            .map(|entry| entry.payload.clone())
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Stops the reaper and waits for it to exit
    ///
    /// Entries already stored remain readable but are no longer expired.
    /// Calling this more than once is a no-op.
    pub async fn shutdown(&mut self) {
        let Some(reaper) = self.reaper.take() else {
            return;
        };
        let _ = self.shutdown_tx.send(()).await;
        let _ = reaper.await;
        debug!("Response cache reaper stopped");
    }
}

/// Wakes once per `reap_interval` and evicts stale entries until signalled
///
/// The loop also ends when the sending half of the shutdown channel is dropped
/// together with its `Cache`.
async fn reap_loop(entries: EntryMap, config: CacheConfig, mut shutdown_rx: mpsc::Receiver<()>) {
    let mut ticker = tokio::time::interval(config.reap_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Skip the first tick (immediate)
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = reap(&entries, Instant::now(), config.max_age);
                if removed > 0 {
                    debug!(removed, "Reaped stale cache entries");
                }
            }
            _ = shutdown_rx.recv() => {
                break;
            }
        }
    }
}

/// Removes every entry whose age is strictly greater than `max_age`
fn reap(entries: &Mutex<HashMap<String, CacheEntry>>, now: Instant, max_age: Duration) -> usize {
    let mut entries = entries.lock();
    let before = entries.len();
    entries.retain(|_, entry| now.saturating_duration_since(entry.created_at) <= max_age);
    before - entries.len()
}
