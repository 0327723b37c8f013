//! The windowing engine: one instance per scrollable list.
//!
//! [`WindowEngine`] owns the mutable windowing state (height cache, block
//! insets, current slice, pending anchor) and is driven cooperatively by
//! the host:
//!
//! 1. Host events call [`on_scroll`](WindowEngine::on_scroll),
//!    [`report_heights`](WindowEngine::report_heights),
//!    [`set_items`](WindowEngine::set_items), or
//!    [`scroll_to`](WindowEngine::scroll_to).
//! 2. When [`needs_frame`](WindowEngine::needs_frame) turns true, the host
//!    calls [`settle`](WindowEngine::settle) on its next frame tick and
//!    renders the published [`WindowSnapshot`]: the items in `slice`, with
//!    `blank_above`/`blank_below` reserved as empty extent.
//! 3. Once the render is committed, the host calls
//!    [`finish_render`](WindowEngine::finish_render), which flushes height
//!    reports that arrived mid-render and issues any pending scroll
//!    correction through the [`ScrollEffector`].
//!
//! The host never mutates windowing state directly; it supplies raw
//! measurements and reads published snapshots.

use crate::anchor::{ScrollAnchor, SlicePlan, compensation_delta, plan_items_change};
use crate::config::EngineConfig;
use crate::host::ScrollEffector;
use crate::scheduler::{RenderPhase, UpdateScheduler};
use std::hash::Hash;
use tracing::{debug, trace};
use viewslice_core::{BlankSpace, BlockInsets, HeightCache, Slice, ViewportInset};
use web_time::Instant;

/// Immutable result of one settled recompute.
///
/// Published once per [`WindowEngine::settle`], never mid-recompute. The
/// host renders `slice` and reserves `blank_above`/`blank_below` of empty
/// extent so native scroll geometry stays correct with only a slice of the
/// content materialized.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowSnapshot {
    /// Index range to materialize.
    pub slice: Slice,
    /// Unrendered extent above the slice.
    pub blank_above: f64,
    /// Unrendered extent below the slice.
    pub blank_below: f64,
    /// Total content extent across all items.
    pub total_extent: f64,
    /// The viewport this snapshot was computed for.
    pub viewport: ViewportInset,
}

impl WindowSnapshot {
    /// Extent covered by the materialized items.
    #[must_use]
    pub fn rendered_extent(&self) -> f64 {
        self.total_extent - self.blank_above - self.blank_below
    }
}

/// Counters for one engine instance, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameStats {
    /// Settled recomputes performed.
    pub recomputes: u64,
    /// Scroll corrections issued to the host.
    pub corrections_issued: u64,
    /// Scroll events absorbed by the throttle.
    pub coalesced_scroll_events: u32,
}

/// Viewport windowing engine for one ordered, variable-height item list.
///
/// `K` is the host's stable item id: any hashable value that identifies an
/// item across reorders, insertions, and removals. Identity is determined
/// solely by id, never by position.
#[derive(Debug)]
pub struct WindowEngine<K> {
    config: EngineConfig,
    ids: Vec<K>,
    heights: HeightCache<K>,
    insets: BlockInsets,
    slice: Option<Slice>,
    anchor: ScrollAnchor,
    /// Anchor for a forced window rebuild after an item-set change, when no
    /// explicit scroll target is pending.
    rebuild_anchor: Option<usize>,
    scheduler: UpdateScheduler,
    /// Height reports received while a render pass was in flight.
    queued_reports: Vec<(K, f64)>,
    /// Net scroll delta owed to the host, issued when the render settles.
    pending_correction: f64,
    recomputes: u64,
    corrections_issued: u64,
}

impl<K: Hash + Eq + Clone> WindowEngine<K> {
    /// Create an engine with no items.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        debug_assert!(
            config.assumed_item_height > 0.0,
            "assumed item height must be positive"
        );
        let heights = HeightCache::new(config.assumed_item_height);
        let scheduler = UpdateScheduler::new(config.scroll_throttle);
        Self {
            config,
            ids: Vec::new(),
            heights,
            insets: BlockInsets::default(),
            slice: None,
            anchor: ScrollAnchor::new(),
            rebuild_anchor: None,
            scheduler,
            queued_reports: Vec::new(),
            pending_correction: 0.0,
            recomputes: 0,
            corrections_issued: 0,
        }
    }

    /// Create an engine with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    // -- host event entry points --------------------------------------

    /// Replace the item sequence. Applied synchronously.
    ///
    /// If the ids at the previous window's boundaries are unchanged, the
    /// window survives with its end clamped to the new count and no scroll
    /// correction is issued. Otherwise the window is rebuilt on the next
    /// settle, anchored at the pending scroll target (or the configured
    /// initial index).
    pub fn set_items<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = K>,
    {
        if self.scheduler.is_stopped() {
            return;
        }
        let new_ids: Vec<K> = items.into_iter().collect();
        let plan = plan_items_change(
            &self.ids,
            &new_ids,
            self.slice,
            self.anchor.target(),
            self.config.initial_item_index,
        );
        self.ids = new_ids;
        self.insets = BlockInsets::compute(self.ids.iter(), &self.heights);

        match plan {
            SlicePlan::Preserve(slice) => {
                trace!(start = slice.start, end = slice.end, "window preserved");
                self.slice = Some(slice);
            }
            SlicePlan::Rebuild { anchor } => {
                debug!(anchor, items = self.ids.len(), "window rebuild scheduled");
                self.slice = None;
                self.rebuild_anchor = Some(anchor);
            }
        }
        self.scheduler.request_recompute();
    }

    /// Replace the item sequence from host items plus an id extractor.
    pub fn set_items_with<T, I, F>(&mut self, items: I, id_of: F)
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> K,
    {
        self.set_items(items.into_iter().map(id_of));
    }

    /// Feed a batch of measured heights from the host's size observation.
    ///
    /// Batches covering several elements at once and spurious callbacks
    /// with unchanged sizes are both fine. Reports arriving while a render
    /// pass is in flight are queued and flushed when the render settles;
    /// applying them inline would mutate layout state mid-render.
    pub fn report_heights<I>(&mut self, reports: I)
    where
        I: IntoIterator<Item = (K, f64)>,
    {
        if self.scheduler.is_stopped() {
            return;
        }
        if self.scheduler.phase() == RenderPhase::Rendering {
            self.queued_reports.extend(reports);
            trace!(queued = self.queued_reports.len(), "height reports queued mid-render");
            return;
        }
        self.apply_reports(reports);
    }

    /// A host scroll event occurred at `now`.
    ///
    /// Returns `true` if a recompute was scheduled for the next frame;
    /// events inside the throttle window coalesce into one trailing
    /// recompute over latest state.
    pub fn on_scroll(&mut self, now: Instant) -> bool {
        self.scheduler.on_scroll(now)
    }

    /// Request a one-shot scroll to `index`.
    ///
    /// Out-of-range indices are clamped, not rejected: a target at or past
    /// the item count anchors to the bottom-most extent. The next settle
    /// rebuilds the window at the target and, once it has been rendered,
    /// the correction delta is issued through the scroll effector.
    pub fn scroll_to(&mut self, index: usize) {
        if self.scheduler.is_stopped() {
            return;
        }
        let target = index.min(self.ids.len());
        debug!(requested = index, target, "scroll to index");
        self.anchor.request(target);
        self.slice = None;
        self.scheduler.request_recompute();
    }

    /// Whether the host should drive a frame tick.
    #[must_use]
    pub fn needs_frame(&self, now: Instant) -> bool {
        self.scheduler.needs_frame(now)
    }

    // -- frame protocol ------------------------------------------------

    /// Recompute the window for the current `viewport` and publish it.
    ///
    /// Enters the render phase: the host must render the returned snapshot
    /// and then call [`finish_render`](Self::finish_render). Returns `None`
    /// after [`dispose`](Self::dispose). Idempotent given the same inputs.
    pub fn settle(&mut self, viewport: ViewportInset, now: Instant) -> Option<WindowSnapshot> {
        if !self.scheduler.begin_render(now) {
            return None;
        }

        let anchor_target = self.anchor.take();
        let slice = match self.slice {
            Some(_) => Slice::select(
                &self.insets,
                viewport,
                self.config.offscreen_to_viewport_ratio,
            ),
            // No prior layout (mount, scroll_to, or forced rebuild): walk
            // forward from the anchor until one viewport extent is filled.
            None => {
                let anchor = anchor_target
                    .or(self.rebuild_anchor.take())
                    .or(self.config.initial_item_index)
                    .unwrap_or(0);
                let ids = &self.ids;
                let heights = &self.heights;
                Slice::initial(
                    |i| heights.get(&ids[i]),
                    ids.len(),
                    anchor,
                    viewport.extent(),
                )
            }
        };
        self.slice = Some(slice);

        // One-shot correction for an index-directed scroll. Computed here
        // against the extents this render will materialize, issued once the
        // host has committed them.
        if let Some(target) = anchor_target {
            let delta = self.insets.anchor_offset(target) - viewport.top;
            if delta != 0.0 {
                self.pending_correction += delta;
            }
            trace!(target, delta, "anchor correction staged");
        }

        self.recomputes += 1;
        let blank = self.insets.blank_space(slice);
        trace!(
            start = slice.start,
            end = slice.end,
            above = blank.above,
            below = blank.below,
            "window settled"
        );
        Some(WindowSnapshot {
            slice,
            blank_above: blank.above,
            blank_below: blank.below,
            total_extent: self.insets.total_extent(),
            viewport,
        })
    }

    /// The host committed the published slice.
    ///
    /// Issues the pending scroll correction (the new extents now exist in
    /// the host, so a relative scroll lands where the layout says it will)
    /// and flushes height reports queued during the render, which may
    /// schedule a further frame.
    pub fn finish_render(&mut self, scroll: &mut dyn ScrollEffector) {
        if self.scheduler.is_stopped() {
            return;
        }

        if self.pending_correction != 0.0 {
            let delta = std::mem::take(&mut self.pending_correction);
            debug!(delta, "scroll correction issued");
            scroll.scroll_by(delta);
            self.corrections_issued += 1;
        }

        // Corrections staged by this flush belong to the next cycle: they
        // compensate a layout the host has not rendered yet.
        if self.scheduler.finish_render(!self.queued_reports.is_empty()) {
            let queued = std::mem::take(&mut self.queued_reports);
            trace!(count = queued.len(), "flushing queued height reports");
            self.apply_reports(queued);
            self.scheduler.mark_flushed();
        }
    }

    /// Permanently stop the engine. Every later entry point is a no-op, so
    /// callbacks the host already scheduled can fire harmlessly.
    pub fn dispose(&mut self) {
        debug!(items = self.ids.len(), "engine disposed");
        self.scheduler.dispose();
        self.queued_reports.clear();
        self.pending_correction = 0.0;
        self.anchor.clear();
    }

    // -- published state ------------------------------------------------

    /// Number of items in the current sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the item sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The most recently settled window, if any.
    #[must_use]
    pub fn slice(&self) -> Option<Slice> {
        self.slice
    }

    /// Current per-item extents.
    #[must_use]
    pub fn insets(&self) -> &BlockInsets {
        &self.insets
    }

    /// Blank extents around `slice` in the current layout.
    #[must_use]
    pub fn blank_space(&self, slice: Slice) -> BlankSpace {
        self.insets.blank_space(slice)
    }

    /// Measured heights (with assumed fallback).
    #[must_use]
    pub fn heights(&self) -> &HeightCache<K> {
        &self.heights
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pending index-directed scroll target, if any.
    #[must_use]
    pub fn pending_anchor(&self) -> Option<usize> {
        self.anchor.target()
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.scheduler.is_stopped()
    }

    /// Where the engine is in its render cycle.
    #[must_use]
    pub fn render_phase(&self) -> RenderPhase {
        self.scheduler.phase()
    }

    /// Counters since construction.
    #[must_use]
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            recomputes: self.recomputes,
            corrections_issued: self.corrections_issued,
            coalesced_scroll_events: self.scheduler.coalesced_scrolls(),
        }
    }

    // -- internals ------------------------------------------------------

    /// Merge reports and, when layout changed, stage a compensating scroll
    /// so the window's anchor item does not visually move.
    fn apply_reports<I>(&mut self, reports: I)
    where
        I: IntoIterator<Item = (K, f64)>,
    {
        let anchor_index = self.slice.filter(|s| !s.is_empty()).map(|s| s.start);
        let old_insets = std::mem::take(&mut self.insets);

        if !self.heights.merge(reports) {
            // Spurious observation; keep the existing layout untouched.
            self.insets = old_insets;
            return;
        }

        self.insets = BlockInsets::compute(self.ids.iter(), &self.heights);
        if let Some(index) = anchor_index {
            let delta = compensation_delta(&old_insets, &self.insets, index);
            if delta != 0.0 {
                debug!(anchor = index, delta, "layout shift compensation staged");
                self.pending_correction += delta;
            }
        }
        self.scheduler.request_recompute();
    }
}
