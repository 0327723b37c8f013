//! Deterministic simulated host for exercising the windowing engine.
//!
//! Integration tests need a host that scrolls, renders, measures, and keeps
//! its own clock, without any real UI behind it. [`SimulatedHost`] drives a
//! [`WindowEngine`] through the full frame protocol against a scripted
//! scroll position and a manually advanced clock, and records every scroll
//! correction the engine issues.

#![forbid(unsafe_code)]

use viewslice_engine::{
    EngineConfig, ScrollEffector, ViewportInset, WindowEngine, WindowSnapshot,
};
use web_time::{Duration, Instant};

/// Scroll effector that records every delta it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingScroller {
    deltas: Vec<f64>,
}

impl RecordingScroller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All deltas received, in order.
    #[must_use]
    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    /// Net scroll movement across all corrections.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.deltas.iter().sum()
    }

    /// Forget recorded deltas.
    pub fn clear(&mut self) {
        self.deltas.clear();
    }
}

impl ScrollEffector for RecordingScroller {
    fn scroll_by(&mut self, delta: f64) {
        self.deltas.push(delta);
    }
}

/// A scripted host: engine, scroll container, and clock in one place.
///
/// The host applies corrections to its own scroll position the way a real
/// scroll container would, so tests can assert both on the raw correction
/// deltas and on where the viewport ends up.
#[derive(Debug)]
pub struct SimulatedHost {
    engine: WindowEngine<u64>,
    scroller: RecordingScroller,
    scroll_top: f64,
    viewport_extent: f64,
    now: Instant,
}

impl SimulatedHost {
    /// Create a host with a viewport of `viewport_extent` content units,
    /// scrolled to the top.
    #[must_use]
    pub fn new(config: EngineConfig, viewport_extent: f64) -> Self {
        Self {
            engine: WindowEngine::new(config),
            scroller: RecordingScroller::new(),
            scroll_top: 0.0,
            viewport_extent,
            now: Instant::now(),
        }
    }

    /// The engine under test.
    #[must_use]
    pub fn engine(&self) -> &WindowEngine<u64> {
        &self.engine
    }

    /// Mutable access for calls the harness does not wrap.
    pub fn engine_mut(&mut self) -> &mut WindowEngine<u64> {
        &mut self.engine
    }

    /// Corrections issued so far.
    #[must_use]
    pub fn scroller(&self) -> &RecordingScroller {
        &self.scroller
    }

    /// Current scroll offset of the simulated container.
    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// The visible region in content coordinates.
    #[must_use]
    pub fn viewport(&self) -> ViewportInset {
        ViewportInset::new(self.scroll_top, self.scroll_top + self.viewport_extent)
    }

    /// Advance the simulated clock.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Replace the item sequence with `count` sequential ids.
    pub fn load_items(&mut self, count: u64) {
        self.engine.set_items(0..count);
    }

    /// The user scrolled the container to `top`.
    pub fn user_scrolls_to(&mut self, top: f64) {
        self.scroll_top = top;
        self.engine.on_scroll(self.now);
    }

    /// The host's size observation measured some items.
    pub fn measure<I>(&mut self, reports: I)
    where
        I: IntoIterator<Item = (u64, f64)>,
    {
        self.engine.report_heights(reports);
    }

    /// Run one frame tick if the engine asked for one.
    ///
    /// Settles, "renders" (nothing to do in simulation), finishes, and
    /// applies any issued correction to the simulated scroll position.
    /// Returns the published snapshot, or `None` when no frame was due.
    pub fn run_frame(&mut self) -> Option<WindowSnapshot> {
        if !self.engine.needs_frame(self.now) {
            return None;
        }
        let snapshot = self.engine.settle(self.viewport(), self.now)?;

        let issued_before = self.scroller.deltas().len();
        self.engine.finish_render(&mut self.scroller);
        let applied: f64 = self.scroller.deltas()[issued_before..].iter().sum();
        self.scroll_top += applied;

        Some(snapshot)
    }

    /// Run frame ticks until the engine goes quiet, at most `limit` frames.
    ///
    /// Panics when the engine still wants frames after `limit` ticks; a
    /// settled engine must reach quiescence without new input.
    pub fn run_until_quiet(&mut self, limit: usize) -> Vec<WindowSnapshot> {
        let mut snapshots = Vec::new();
        for _ in 0..limit {
            match self.run_frame() {
                Some(snapshot) => snapshots.push(snapshot),
                None => return snapshots,
            }
        }
        assert!(
            !self.engine.needs_frame(self.now),
            "engine did not reach quiescence within {limit} frames"
        );
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> SimulatedHost {
        let config = EngineConfig::default()
            .with_assumed_item_height(50.0)
            .with_offscreen_ratio(0.0)
            .with_scroll_throttle(Duration::ZERO);
        SimulatedHost::new(config, 200.0)
    }

    #[test]
    fn frame_runs_only_when_due() {
        let mut host = host();
        assert!(host.run_frame().is_none());

        host.load_items(100);
        assert!(host.run_frame().is_some());
        assert!(host.run_frame().is_none());
    }

    #[test]
    fn corrections_move_the_simulated_scroll_position() {
        let mut host = host();
        host.load_items(100);
        host.run_until_quiet(4);

        host.engine_mut().scroll_to(10);
        host.run_until_quiet(4);
        assert_eq!(host.scroll_top(), 500.0);
        assert_eq!(host.scroller().total(), 500.0);
    }

    #[test]
    fn run_until_quiet_drains_follow_up_frames() {
        let mut host = host();
        host.load_items(100);
        host.run_until_quiet(4);

        host.measure([(0, 80.0), (1, 120.0)]);
        let snapshots = host.run_until_quiet(4);
        assert!(!snapshots.is_empty());
        assert!(!host.engine().needs_frame(Instant::now()));
    }
}
