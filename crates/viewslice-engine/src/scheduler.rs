//! Update scheduling: throttling, deferral, and re-entrancy discipline.
//!
//! All engine work runs on one logical thread; the scheduler's job is to
//! decide *when* deferred work runs, never to run it in parallel. Three
//! trigger sources get three different treatments:
//!
//! - **Scroll events** are throttled to at most one recompute per
//!   configured interval, and the recompute itself waits for the next frame
//!   tick, so a burst of events collapses into one pass over latest state.
//! - **Height reports** that arrive while a render pass is in flight are
//!   queued by the engine; the scheduler tracks the render phase so the
//!   queue is flushed only once the render settles. Applying them inline
//!   would mutate layout state mid-render.
//! - **Item-set changes** apply synchronously; only the resulting scroll
//!   correction is deferred until the new slice exists in the host.
//!
//! Teardown sets a permanent stopped flag; every scheduled entry point
//! checks it first, so callbacks that were already queued become no-ops.

use bitflags::bitflags;
use web_time::{Duration, Instant};

bitflags! {
    /// Work deferred to the next frame tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct Pending: u8 {
        /// Layout/slice recompute is due.
        const RECOMPUTE = 1 << 0;
    }
}

/// Where the engine is in its cooperative render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPhase {
    /// No render pass in flight; reports apply immediately.
    #[default]
    Idle,
    /// Between `settle` and `finish_render`; reports are queued.
    Rendering,
    /// Render settled with reports queued; they flush before going idle.
    FlushPending,
}

/// Leading-edge throttle with a trailing slot so the final event in a burst
/// is never lost.
#[derive(Debug, Clone)]
struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
    trailing: bool,
}

impl Throttle {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            trailing: false,
        }
    }

    /// Feed one event. Returns `true` if it should fire now; otherwise the
    /// event is remembered as a trailing candidate.
    fn accept(&mut self, now: Instant) -> bool {
        let due = self
            .last_fired
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.last_fired = Some(now);
            self.trailing = false;
        } else {
            self.trailing = true;
        }
        due
    }

    /// Fire the trailing slot once the interval has elapsed.
    fn poll_trailing(&mut self, now: Instant) -> bool {
        if self.trailing && self.accept(now) {
            // accept() cleared the trailing flag.
            return true;
        }
        false
    }
}

/// Single-threaded cooperative scheduler for one engine instance.
#[derive(Debug, Clone)]
pub(crate) struct UpdateScheduler {
    pending: Pending,
    phase: RenderPhase,
    throttle: Throttle,
    stopped: bool,
    coalesced_scrolls: u32,
}

impl UpdateScheduler {
    pub(crate) fn new(scroll_throttle: Duration) -> Self {
        Self {
            pending: Pending::empty(),
            phase: RenderPhase::Idle,
            throttle: Throttle::new(scroll_throttle),
            stopped: false,
            coalesced_scrolls: 0,
        }
    }

    pub(crate) fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Permanently stop the scheduler; all further triggers are no-ops.
    pub(crate) fn dispose(&mut self) {
        self.stopped = true;
        self.pending = Pending::empty();
    }

    /// A scroll event arrived. Returns `true` if a recompute got scheduled
    /// for the next frame; events inside the throttle window coalesce into
    /// the trailing slot.
    pub(crate) fn on_scroll(&mut self, now: Instant) -> bool {
        if self.stopped {
            return false;
        }
        if self.throttle.accept(now) {
            self.pending |= Pending::RECOMPUTE;
            true
        } else {
            self.coalesced_scrolls = self.coalesced_scrolls.saturating_add(1);
            false
        }
    }

    /// Schedule a recompute unconditionally (item-set or height change).
    pub(crate) fn request_recompute(&mut self) {
        if !self.stopped {
            self.pending |= Pending::RECOMPUTE;
        }
    }

    /// Whether the host should drive a frame tick.
    pub(crate) fn needs_frame(&self, now: Instant) -> bool {
        if self.stopped {
            return false;
        }
        if self.pending.contains(Pending::RECOMPUTE) {
            return true;
        }
        // A trailing scroll becomes due once the throttle interval passes.
        self.throttle.trailing
            && self
                .throttle
                .last_fired
                .is_none_or(|last| now.saturating_duration_since(last) >= self.throttle.interval)
    }

    /// Enter a render pass. Consumes the pending recompute flag (the pass
    /// recomputes from latest state) and promotes a due trailing scroll.
    /// Returns `false` when stopped.
    pub(crate) fn begin_render(&mut self, now: Instant) -> bool {
        if self.stopped {
            return false;
        }
        if self.throttle.poll_trailing(now) {
            self.pending |= Pending::RECOMPUTE;
        }
        self.pending.remove(Pending::RECOMPUTE);
        self.phase = RenderPhase::Rendering;
        true
    }

    /// The host finished rendering the published slice. Returns `true` when
    /// queued height reports must be flushed before going idle.
    pub(crate) fn finish_render(&mut self, has_queued_reports: bool) -> bool {
        if self.stopped {
            return false;
        }
        if has_queued_reports {
            self.phase = RenderPhase::FlushPending;
            true
        } else {
            self.phase = RenderPhase::Idle;
            false
        }
    }

    /// Queued reports were applied; the cycle is complete.
    pub(crate) fn mark_flushed(&mut self) {
        if !self.stopped {
            self.phase = RenderPhase::Idle;
        }
    }

    /// Scroll events absorbed by the throttle so far.
    pub(crate) fn coalesced_scrolls(&self) -> u32 {
        self.coalesced_scrolls
    }
}
