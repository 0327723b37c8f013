//! Scroll anchoring: keeping the user's visual position stable while the
//! item sequence and measured heights shift underneath it.
//!
//! Two separate mechanisms live here:
//!
//! - [`ScrollAnchor`]: the pending target of an index-directed scroll. Set
//!   once (by `scroll_to` or by an item-set change that could not preserve
//!   the window), cleared once the one-shot correction has been issued.
//! - [`SlicePlan`]: the decision, taken synchronously on every item-set
//!   change, of whether the existing render window is still meaningful.

use viewslice_core::{BlockInsets, Slice};

/// Pending index-directed scroll target.
///
/// `None` means no correction is outstanding. The engine computes the
/// correction delta against freshly rendered extents, issues it through the
/// host's scroll effector, and clears the anchor in the same settle pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollAnchor {
    target: Option<usize>,
}

impl ScrollAnchor {
    /// Anchor with no pending target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a one-shot scroll to `index`.
    pub fn request(&mut self, index: usize) {
        self.target = Some(index);
    }

    /// The pending target, if any.
    #[must_use]
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Take and clear the pending target.
    pub fn take(&mut self) -> Option<usize> {
        self.target.take()
    }

    /// Drop the pending target without satisfying it.
    pub fn clear(&mut self) {
        self.target = None;
    }
}

/// What to do with the render window after an item-set change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlicePlan {
    /// The boundary items are unchanged; the window survives with its end
    /// clamped to the new item count. No scroll correction is needed
    /// because the anchor item did not move.
    Preserve(Slice),
    /// The old window is no longer meaningful (reorder, insertion before
    /// the anchor, wholesale replacement). Rebuild from the initial-slice
    /// walk anchored at `anchor`.
    Rebuild {
        /// Index the rebuilt window starts from.
        anchor: usize,
    },
}

/// Decide whether `prev_slice` survives the change from `old_ids` to
/// `new_ids`.
///
/// The previously rendered window is kept when the ids at its start and
/// last-rendered boundary are identical in both sequences: in that case the
/// sequence can only have grown or shrunk past the boundary. Any boundary
/// mismatch forces a rebuild anchored at the pending scroll target, falling
/// back to the configured initial index.
pub fn plan_items_change<K: PartialEq>(
    old_ids: &[K],
    new_ids: &[K],
    prev_slice: Option<Slice>,
    pending_anchor: Option<usize>,
    initial_index: Option<usize>,
) -> SlicePlan {
    let rebuild_anchor = pending_anchor.or(initial_index).unwrap_or(0);

    let Some(slice) = prev_slice else {
        return SlicePlan::Rebuild {
            anchor: rebuild_anchor,
        };
    };
    if slice.is_empty() {
        return SlicePlan::Rebuild {
            anchor: rebuild_anchor,
        };
    }

    let boundary_intact = |index: usize| match (old_ids.get(index), new_ids.get(index)) {
        (Some(old), Some(new)) => old == new,
        _ => false,
    };

    if boundary_intact(slice.start) && boundary_intact(slice.end - 1) {
        SlicePlan::Preserve(slice.clamped_to(new_ids.len()))
    } else {
        SlicePlan::Rebuild {
            anchor: rebuild_anchor,
        }
    }
}

/// Compensation delta for a height change: how far the top edge of the
/// window's anchor item moved between the old and new layout.
///
/// Issuing this delta as a relative scroll keeps the anchor item visually
/// fixed. Heights that changed strictly below the anchor leave its top
/// untouched, so the delta is zero and no correction is issued.
#[must_use]
pub fn compensation_delta(
    old_insets: &BlockInsets,
    new_insets: &BlockInsets,
    anchor_index: usize,
) -> f64 {
    new_insets.anchor_offset(anchor_index) - old_insets.anchor_offset(anchor_index)
}
