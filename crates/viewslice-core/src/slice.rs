//! Visible-window computation: which contiguous index range to materialize.
//!
//! Selection is a tolerance-widened viewport query, not an exact visibility
//! query: the viewport is expanded by a configurable multiple of its own
//! extent on both sides so a buffer of off-screen items is already rendered
//! when the user scrolls.
//!
//! # Boundary policy
//!
//! One policy, applied consistently and covered by tests:
//!
//! - An item is included from the `start` side while its `bottom` edge lies
//!   strictly below the widened lower bound (`bottom > lo`).
//! - An item whose `top` edge sits at or past the widened upper bound
//!   (`top >= hi`) is excluded. In particular, with a zero offscreen ratio
//!   an item starting exactly at the viewport's bottom edge is not rendered.
//! - If no item's bottom clears the lower bound (the viewport sits past the
//!   end of the content), the slice holds just the last item rather than
//!   resetting to the top of the list.

use crate::inset::{BlockInsets, ViewportInset};

/// A contiguous, always-valid index range of materialized items.
///
/// Invariants: `start <= end`, both within `0..=item_count`, and the slice
/// is non-empty whenever the item count is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slice {
    /// First materialized index, inclusive.
    pub start: usize,
    /// Last materialized index, exclusive.
    pub end: usize,
}

impl Slice {
    /// The empty slice, only valid for an empty item sequence.
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    /// Create a slice from explicit bounds.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "slice bounds inverted: {start} > {end}");
        Self { start, end }
    }

    /// Number of materialized items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether no items are materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `index` falls inside the slice.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    /// Clamp both bounds to an item count of `len`, keeping `start <= end`.
    #[must_use]
    pub fn clamped_to(self, len: usize) -> Self {
        let start = self.start.min(len);
        Self {
            start,
            end: self.end.clamp(start, len),
        }
    }

    /// Select the render window for `viewport` over `insets`.
    ///
    /// The viewport is widened by `offscreen_ratio * viewport.extent()` on
    /// both sides; see the module docs for the boundary policy. Runs one
    /// linear scan over the insets.
    #[must_use]
    pub fn select(insets: &BlockInsets, viewport: ViewportInset, offscreen_ratio: f64) -> Self {
        let len = insets.len();
        if len == 0 {
            return Self::EMPTY;
        }

        let offscreen = viewport.extent().max(0.0) * offscreen_ratio.max(0.0);
        let lo = viewport.top - offscreen;
        let hi = viewport.bottom + offscreen;

        // Viewport past the end of the content: keep the last item rather
        // than falling back to index 0.
        let start = insets
            .iter()
            .position(|b| b.bottom > lo)
            .unwrap_or(len - 1);

        let end = (start..len)
            .find(|&i| insets.get(i).is_some_and(|b| b.top >= hi))
            .unwrap_or(len);

        // A viewport entirely above the content would otherwise produce an
        // empty window; always keep at least one item materialized.
        Self {
            start,
            end: end.max(start + 1),
        }
    }

    /// Compute the first render window when no prior layout exists.
    ///
    /// Used on mount and for index-targeted rebuilds: there is no current
    /// viewport position in content coordinates yet, so instead of querying
    /// insets this walks forward from `anchor` accumulating heights until
    /// one viewport extent is filled.
    #[must_use]
    pub fn initial<F>(height_of: F, len: usize, anchor: usize, viewport_extent: f64) -> Self
    where
        F: Fn(usize) -> f64,
    {
        if len == 0 {
            return Self::EMPTY;
        }

        let start = anchor.min(len - 1);
        let mut end = start;
        let mut filled = 0.0;
        while end < len && filled < viewport_extent {
            filled += height_of(end);
            end += 1;
        }

        Self {
            start,
            end: end.max(start + 1),
        }
    }
}
