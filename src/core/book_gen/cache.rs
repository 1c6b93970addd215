//! Long-form text cache
//!
//! Chapter text is the expensive part of a book and is requested on demand,
//! often more than once for the same chapter (preview, then export). Results
//! are kept in an LRU keyed by the full [`LongFormRequest`], so any change to
//! title, audience, tone, seed or target is a distinct entry.
//!
//! ```text
//!   get_or_generate(request)
//!            |
//!     +------+------+
//!     |             |
//!    hit           miss
//!     |             |
//!  Arc clone   synthesize (lock released)
//!                   |
//!                 insert
//! ```

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use serde::{Deserialize, Serialize};

use super::longform::{LongFormRequest, LongFormText, LongFormTextSynthesizer};

// ============================================================================
// Constants
// ============================================================================

/// Default number of chapter texts kept (two full books).
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

// ============================================================================
// CacheStats
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries pushed out by capacity limits
    pub evictions: u64,
    pub current_size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hit rate in `[0, 1]`, or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// ============================================================================
// LongFormCache
// ============================================================================

struct Inner {
    entries: LruCache<LongFormRequest, Arc<LongFormText>>,
    stats: CacheStats,
}

/// Thread-safe LRU of synthesized chapter text.
pub struct LongFormCache {
    inner: Mutex<Inner>,
    synthesizer: LongFormTextSynthesizer,
}

impl Default for LongFormCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl LongFormCache {
    /// Create a cache holding at most `capacity` texts (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_synthesizer(capacity, LongFormTextSynthesizer::new())
    }

    pub fn with_synthesizer(capacity: usize, synthesizer: LongFormTextSynthesizer) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                stats: CacheStats {
                    capacity: capacity.get(),
                    ..Default::default()
                },
            }),
            synthesizer,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Entries are immutable once inserted, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached text for `request`, without generating.
    pub fn get(&self, request: &LongFormRequest) -> Option<Arc<LongFormText>> {
        let mut inner = self.lock();
        let found = inner.entries.get(request).cloned();
        match found {
            Some(_) => inner.stats.hits += 1,
            None => inner.stats.misses += 1,
        }
        found
    }

    /// Cached text for `request`, synthesizing and storing it on a miss.
    ///
    /// Synthesis runs outside the lock. Two threads missing on the same key
    /// both generate; the results are identical so the second insert is harmless.
    pub fn get_or_generate(&self, request: &LongFormRequest) -> Arc<LongFormText> {
        if let Some(text) = self.get(request) {
            log::trace!("Long-form cache hit for seed {}", request.seed);
            return text;
        }

        let text = Arc::new(self.synthesizer.synthesize(request));
        self.insert(request.clone(), Arc::clone(&text));
        text
    }

    fn insert(&self, request: LongFormRequest, text: Arc<LongFormText>) {
        let mut inner = self.lock();
        if let Some((evicted, _)) = inner.entries.push(request.clone(), text) {
            if evicted != request {
                inner.stats.evictions += 1;
            }
        }
        inner.stats.current_size = inner.entries.len();
    }

    pub fn contains(&self, request: &LongFormRequest) -> bool {
        self.lock().entries.contains(request)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats.clone()
    }

    /// Drop all entries and reset statistics.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        let capacity = inner.stats.capacity;
        inner.stats = CacheStats {
            capacity,
            ..Default::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::book_gen::rng::Seed;

    fn request(seed: u64) -> LongFormRequest {
        LongFormRequest::new("Thermal Engineering", "B.Tech (India)", "neutral", Seed::new(seed), 600)
    }

    #[test]
    fn test_hit_after_miss() {
        let cache = LongFormCache::with_capacity(4);
        let first = cache.get_or_generate(&request(1));
        let second = cache.get_or_generate(&request(1));

        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.current_size, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = LongFormCache::with_capacity(2);
        cache.get_or_generate(&request(1));
        cache.get_or_generate(&request(2));
        cache.get_or_generate(&request(3));

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&request(1)));
        assert!(cache.contains(&request(3)));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let cache = LongFormCache::with_capacity(0);
        cache.get_or_generate(&request(1));
        assert_eq!(cache.stats().capacity, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cached_text_matches_direct_synthesis() {
        let cache = LongFormCache::default();
        let cached = cache.get_or_generate(&request(9));
        let direct = LongFormTextSynthesizer::new().synthesize(&request(9));
        assert_eq!(cached.text, direct.text);
    }

    #[test]
    fn test_clear_resets() {
        let cache = LongFormCache::with_capacity(3);
        cache.get_or_generate(&request(1));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats { capacity: 3, ..Default::default() });
    }
}
