#![forbid(unsafe_code)]

//! One-pass cell measurement and an LRU cache for it.
//!
//! A presentation layer tends to re-measure the same cells every time it
//! redraws. [`CellMetrics::measure`] computes the UTF-16 length, the
//! repaired scalar count, and well-formedness in a single scan, and
//! [`MetricsCache`] stores results keyed by a hash of the cell's
//! code-unit view.
//!
//! # Example
//! ```
//! use textcell::{MetricsCache, TextCell};
//!
//! let mut cache = MetricsCache::new(1000);
//! let cell = TextCell::from_code_units(&[0x7C, 0xD83D, 0x7C]);
//!
//! // First call measures
//! let metrics = cache.get_or_measure(&cell);
//! assert_eq!(metrics.utf16_len, 3);
//! assert!(!metrics.well_formed);
//!
//! // Second call hits cache
//! let again = cache.get_or_measure(&cell);
//! assert_eq!(again, metrics);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::cell::TextCell;
use crate::unit;
use lru::LruCache;
use rustc_hash::FxHasher;
use std::hash::Hasher;
use std::num::NonZeroUsize;

/// Default cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Measurements of one cell, computed in a single scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellMetrics {
    /// Code units occupied when viewed as UTF-16 (no validation applied).
    pub utf16_len: usize,
    /// Scalar count after lossy repair (equals the scalar count for
    /// scalar text, which needs no repair).
    pub repaired_scalar_len: usize,
    /// Whether the UTF-16 view is well-formed.
    pub well_formed: bool,
}

impl CellMetrics {
    /// Measure a cell.
    #[must_use]
    pub fn measure(cell: &TextCell) -> Self {
        match cell.as_code_units() {
            None => Self {
                utf16_len: cell.utf16_len(),
                repaired_scalar_len: cell.scalar_len().unwrap_or(0),
                well_formed: true,
            },
            Some(units) => {
                let mut scalar_len = 0;
                let mut well_formed = true;
                let mut i = 0;
                while i < units.len() {
                    let u = units[i];
                    if unit::is_high_surrogate(u)
                        && i + 1 < units.len()
                        && unit::is_low_surrogate(units[i + 1])
                    {
                        i += 2;
                    } else {
                        if unit::is_surrogate(u) {
                            well_formed = false;
                        }
                        i += 1;
                    }
                    scalar_len += 1;
                }
                Self {
                    utf16_len: units.len(),
                    repaired_scalar_len: scalar_len,
                    well_formed,
                }
            }
        }
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
    /// Maximum capacity.
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache for cell measurements.
///
/// # Hash Collisions
/// Entries are keyed by a 64-bit FxHash of the cell's code-unit view
/// rather than the cell itself. Two cells whose UTF-16 views agree share
/// an entry; their metrics agree too, so this only trades theoretical
/// collision safety (~1 in 2^64) for memory.
///
/// # Thread Safety
/// `MetricsCache` is not thread-safe. For concurrent use, wrap in a
/// mutex or use thread-local caches.
#[derive(Debug)]
pub struct MetricsCache {
    cache: LruCache<u64, CellMetrics>,
    hits: u64,
    misses: u64,
}

impl MetricsCache {
    /// Create a new cache with the specified capacity.
    ///
    /// If capacity is zero, defaults to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity must be > 0");
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Create a new cache with the default capacity (4096 entries).
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }

    /// Get cached metrics or measure and cache them.
    #[inline]
    pub fn get_or_measure(&mut self, cell: &TextCell) -> CellMetrics {
        let hash = hash_cell(cell);

        if let Some(&metrics) = self.cache.get(&hash) {
            self.hits += 1;
            return metrics;
        }

        self.misses += 1;
        let metrics = CellMetrics::measure(cell);
        self.cache.put(hash, metrics);
        metrics
    }

    /// Check if a cell's metrics are in the cache.
    #[must_use]
    pub fn contains(&self, cell: &TextCell) -> bool {
        self.cache.contains(&hash_cell(cell))
    }

    /// Get cached metrics without measuring.
    ///
    /// Returns `None` if the cell is not in the cache.
    /// Note: This does update the LRU order.
    #[must_use]
    pub fn get(&mut self, cell: &TextCell) -> Option<CellMetrics> {
        self.cache.get(&hash_cell(cell)).copied()
    }

    /// Peek at cached metrics without updating LRU order.
    #[must_use]
    pub fn peek(&self, cell: &TextCell) -> Option<CellMetrics> {
        self.cache.peek(&hash_cell(cell)).copied()
    }

    /// Clear the cache.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Reset statistics.
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
        }
    }

    /// Get the current number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get the cache capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// Resize the cache capacity.
    ///
    /// If the new capacity is smaller than the current size,
    /// entries will be evicted (LRU order).
    pub fn resize(&mut self, new_capacity: usize) {
        let new_capacity = NonZeroUsize::new(new_capacity.max(1)).expect("capacity must be > 0");
        self.cache.resize(new_capacity);
    }
}

impl Default for MetricsCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Hash a cell's code-unit view using FxHash.
#[inline]
fn hash_cell(cell: &TextCell) -> u64 {
    let mut hasher = FxHasher::default();
    let mut len = 0u64;
    for unit in cell.code_units() {
        hasher.write_u16(unit);
        len += 1;
    }
    hasher.write_u64(len);
    hasher.finish()
}

// Thread-local metrics cache for convenience.
#[cfg(feature = "thread_local_cache")]
thread_local! {
    static THREAD_CACHE: std::cell::RefCell<MetricsCache> =
        std::cell::RefCell::new(MetricsCache::with_default_capacity());
}

/// Get or measure metrics using the thread-local cache.
#[cfg(feature = "thread_local_cache")]
pub fn cached_metrics(cell: &TextCell) -> CellMetrics {
    THREAD_CACHE.with(|cache| cache.borrow_mut().get_or_measure(cell))
}
