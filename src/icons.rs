//! Bounded icon bitmap cache with least-recently-used eviction.
//!
//! The cache is keyed by package id and bounded by a byte budget rather than
//! an entry count: every insertion evicts least-recently-used entries until
//! the newcomer fits. A miss is a normal, recoverable condition; callers
//! re-decode or render a placeholder, never treat it as an error.
//!
//! Writes happen on the background load worker while reads happen on
//! whichever thread renders, so all bookkeeping sits behind a `Mutex`.
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;

/// A decoded icon bitmap plus its resident byte cost.
///
/// Pixel data is shared, so cloning a bitmap out of the cache is cheap.
#[derive(Clone, Debug)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw pixel bytes in whatever layout the decoder produced.
    pub data: Arc<[u8]>,
}

impl Bitmap {
    /// Byte cost charged against the cache budget.
    pub fn cost_bytes(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug)]
struct CacheState {
    lru: LruCache<String, Bitmap>,
    cost: usize,
}

/// Byte-budget LRU store mapping package ids to decoded bitmaps.
#[derive(Debug)]
pub struct IconCache {
    state: Mutex<CacheState>,
    budget: usize,
}

impl IconCache {
    /// Create a cache bounded by `budget_bytes` of resident bitmap data.
    ///
    /// The budget is an explicit configuration value; a reasonable choice is
    /// roughly an eighth of the heap the embedder is willing to spend.
    pub fn new(budget_bytes: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                lru: LruCache::unbounded(),
                cost: 0,
            }),
            budget: budget_bytes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("icon cache mutex poisoned; continuing with recovered state");
                poisoned.into_inner()
            }
        }
    }

    /// Look up the bitmap for `package_id`, refreshing its recency.
    pub fn get(&self, package_id: &str) -> Option<Bitmap> {
        self.lock().lru.get(package_id).cloned()
    }

    /// Whether an entry exists, without touching recency.
    pub fn contains(&self, package_id: &str) -> bool {
        self.lock().lru.peek(package_id).is_some()
    }

    /// Insert `bitmap` under `package_id`, evicting least-recently-used
    /// entries until it fits. An entry whose cost exceeds the whole budget is
    /// not inserted.
    pub fn put(&self, package_id: &str, bitmap: Bitmap) {
        let cost = bitmap.cost_bytes();
        if cost > self.budget {
            tracing::debug!(
                package = %package_id,
                cost,
                budget = self.budget,
                "bitmap larger than whole budget; not cached"
            );
            return;
        }
        let mut state = self.lock();
        if let Some(old) = state.lru.pop(package_id) {
            state.cost -= old.cost_bytes();
        }
        while state.cost + cost > self.budget {
            match state.lru.pop_lru() {
                Some((evicted_id, evicted)) => {
                    state.cost -= evicted.cost_bytes();
                    tracing::trace!(package = %evicted_id, "evicted icon to make room");
                }
                None => break,
            }
        }
        state.cost += cost;
        state.lru.put(package_id.to_string(), bitmap);
    }

    /// Drop every entry. Used when the decode subsystem reports resource
    /// exhaustion; decoding may be retried later.
    pub fn evict_all(&self) {
        let mut state = self.lock();
        state.lru.clear();
        state.cost = 0;
    }

    /// Total resident byte cost.
    pub fn cost_bytes(&self) -> usize {
        self.lock().cost
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.lock().lru.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().lru.is_empty()
    }
}
