//! Prefix-sum layout: per-item `[top, bottom)` extents.
//!
//! [`BlockInsets`] is the single source of truth for item positions. No
//! other component computes layout independently; everything downstream
//! (slice selection, blank-space accounting, scroll corrections) reads the
//! extents produced here.

use crate::height_cache::HeightCache;
use crate::slice::Slice;
use std::hash::Hash;

/// One item's computed extent in content coordinates.
///
/// `bottom - top` is the item's effective height. Adjacent items tile
/// exactly: item `i + 1` starts where item `i` ends.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockInset {
    /// Top edge, inclusive.
    pub top: f64,
    /// Bottom edge, exclusive.
    pub bottom: f64,
}

impl BlockInset {
    /// Effective height of the item.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.bottom - self.top
    }
}

/// The currently visible extent, in the same coordinate space as
/// [`BlockInset`] (0 = top of the first item).
///
/// Hosts whose scroll events arrive in window-relative coordinates can use
/// [`translated`](Self::translated) to shift into content space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportInset {
    /// Top edge of the visible region.
    pub top: f64,
    /// Bottom edge of the visible region.
    pub bottom: f64,
}

impl ViewportInset {
    /// Create a viewport inset from its two edges.
    #[must_use]
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Visible extent (height) of the viewport.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.bottom - self.top
    }

    /// Shift both edges by `offset`, translating a window-relative viewport
    /// into content-relative coordinates.
    #[must_use]
    pub fn translated(&self, offset: f64) -> Self {
        Self {
            top: self.top + offset,
            bottom: self.bottom + offset,
        }
    }
}

/// Extent to reserve for unrendered items on either side of a slice.
///
/// Reserving this space is what keeps the host's native scrollbar and
/// scroll height honest while only a slice of items actually exists.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlankSpace {
    /// Unrendered extent above the slice.
    pub above: f64,
    /// Unrendered extent below the slice.
    pub below: f64,
}

/// Ordered per-item extents forming a partition of `[0, total_extent)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockInsets {
    insets: Vec<BlockInset>,
}

impl BlockInsets {
    /// Compute extents for `ids` in order, one prefix-sum pass.
    ///
    /// Each item contributes its cached height, falling back to the cache's
    /// assumed height while unmeasured. Runs in O(n).
    #[must_use]
    pub fn compute<'a, K, I>(ids: I, heights: &HeightCache<K>) -> Self
    where
        K: Hash + Eq + Clone + 'a,
        I: IntoIterator<Item = &'a K>,
    {
        let ids = ids.into_iter();
        let mut insets = Vec::with_capacity(ids.size_hint().0);
        let mut top = 0.0;
        for id in ids {
            let bottom = top + heights.get(id);
            insets.push(BlockInset { top, bottom });
            top = bottom;
        }
        Self { insets }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.insets.len()
    }

    /// Whether there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insets.is_empty()
    }

    /// Extent of item `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<BlockInset> {
        self.insets.get(index).copied()
    }

    /// Iterate extents in item order.
    pub fn iter(&self) -> impl Iterator<Item = BlockInset> + '_ {
        self.insets.iter().copied()
    }

    /// Total content extent (bottom of the last item, or 0 when empty).
    #[must_use]
    pub fn total_extent(&self) -> f64 {
        self.insets.last().map_or(0.0, |b| b.bottom)
    }

    /// Content offset an index-targeted scroll should land on.
    ///
    /// For in-range indices this is the item's top edge; indices at or past
    /// the end anchor to the bottom-most extent, matching the clamping
    /// policy for out-of-range `scroll_to` targets.
    #[must_use]
    pub fn anchor_offset(&self, index: usize) -> f64 {
        self.insets
            .get(index)
            .map_or_else(|| self.total_extent(), |b| b.top)
    }

    /// Blank extents above and below `slice`.
    ///
    /// `above` is the top of the first rendered item (or the full content
    /// extent for an out-of-range start); `below` is everything past the
    /// slice's exclusive end. For every valid slice,
    /// `above + rendered + below == total_extent`.
    #[must_use]
    pub fn blank_space(&self, slice: Slice) -> BlankSpace {
        let total = self.total_extent();
        let above = self
            .insets
            .get(slice.start)
            .map_or(total, |b| b.top);
        let below = self
            .insets
            .get(slice.end)
            .map_or(0.0, |b| total - b.top);
        BlankSpace { above, below }
    }
}
