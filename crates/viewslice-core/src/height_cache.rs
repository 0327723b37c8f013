//! Measured item heights keyed by stable id.
//!
//! Heights are learned lazily: every item starts at the assumed height and
//! is overwritten once the host reports a real measurement. Ids that leave
//! the item sequence keep their entry (it is simply never read again), so a
//! removed-then-restored item comes back at its measured height.

use ahash::AHashMap;
use std::hash::Hash;

/// Id-to-height mapping with a configured fallback for unmeasured items.
///
/// [`merge`](Self::merge) is a pure state update: it applies only reports
/// that differ from the cached value and tells the caller whether anything
/// changed. The caller decides whether a relayout is warranted, which keeps
/// spurious resize-observer callbacks from triggering redundant work.
#[derive(Debug, Clone)]
pub struct HeightCache<K> {
    heights: AHashMap<K, f64>,
    assumed_height: f64,
}

impl<K: Hash + Eq + Clone> HeightCache<K> {
    /// Create a cache where every unmeasured item is `assumed_height` tall.
    ///
    /// `assumed_height` must be positive; a non-positive value is a host
    /// configuration error the engine does not recover from.
    #[must_use]
    pub fn new(assumed_height: f64) -> Self {
        debug_assert!(
            assumed_height > 0.0,
            "assumed height must be positive, got {assumed_height}"
        );
        Self {
            heights: AHashMap::new(),
            assumed_height,
        }
    }

    /// The fallback height for ids without a measurement.
    #[must_use]
    pub fn assumed_height(&self) -> f64 {
        self.assumed_height
    }

    /// Measured height for `id`, or the assumed height if unmeasured.
    #[must_use]
    pub fn get(&self, id: &K) -> f64 {
        self.heights.get(id).copied().unwrap_or(self.assumed_height)
    }

    /// Whether `id` has a real measurement.
    #[must_use]
    pub fn is_measured(&self, id: &K) -> bool {
        self.heights.contains_key(id)
    }

    /// Number of measured entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether no measurements have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Apply a batch of measured heights, returning whether any entry changed.
    ///
    /// Reports equal to the cached value (numeric equality) are ignored, so
    /// merging the same batch twice returns `false` the second time. An id
    /// not yet in the cache always counts as a change, even if the reported
    /// value happens to equal the assumed height: from that point on the
    /// item's height is known rather than guessed.
    pub fn merge<I>(&mut self, reports: I) -> bool
    where
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut changed = false;
        for (id, height) in reports {
            if self.heights.get(&id) == Some(&height) {
                continue;
            }
            self.heights.insert(id, height);
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmeasured_id_returns_assumed_height() {
        let cache: HeightCache<u64> = HeightCache::new(200.0);
        assert_eq!(cache.get(&7), 200.0);
        assert!(!cache.is_measured(&7));
        assert!(cache.is_empty());
    }

    #[test]
    fn merge_overwrites_and_reports_change() {
        let mut cache = HeightCache::new(200.0);
        assert!(cache.merge([(1u64, 120.0), (2, 340.0)]));
        assert_eq!(cache.get(&1), 120.0);
        assert_eq!(cache.get(&2), 340.0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut cache = HeightCache::new(200.0);
        assert!(cache.merge([(1u64, 120.0)]));
        assert!(!cache.merge([(1u64, 120.0)]));
    }

    #[test]
    fn merge_skips_unchanged_entries_within_batch() {
        let mut cache = HeightCache::new(200.0);
        cache.merge([(1u64, 120.0), (2, 90.0)]);
        // Only id 2 differs; the batch still counts as changed.
        assert!(cache.merge([(1u64, 120.0), (2, 91.0)]));
        assert_eq!(cache.get(&2), 91.0);
    }

    #[test]
    fn report_equal_to_assumed_height_still_counts_as_measured() {
        let mut cache = HeightCache::new(200.0);
        assert!(cache.merge([(1u64, 200.0)]));
        assert!(cache.is_measured(&1));
        assert!(!cache.merge([(1u64, 200.0)]));
    }

    #[test]
    fn entries_survive_ids_leaving_the_sequence() {
        // The cache has no notion of the live item set; stale entries are
        // retained and simply never read for absent ids.
        let mut cache = HeightCache::new(200.0);
        cache.merge([(1u64, 120.0)]);
        assert_eq!(cache.get(&1), 120.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn string_ids_work() {
        let mut cache: HeightCache<String> = HeightCache::new(50.0);
        cache.merge([("entry-1".to_string(), 75.0)]);
        assert_eq!(cache.get(&"entry-1".to_string()), 75.0);
        assert_eq!(cache.get(&"entry-2".to_string()), 50.0);
    }
}
