//! Engine tuning parameters.

use web_time::Duration;

/// Tuning knobs for a [`WindowEngine`](crate::WindowEngine).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Fallback height for items that have not been measured yet.
    /// Must be positive.
    pub assumed_item_height: f64,

    /// How much extra content beyond the visible viewport stays
    /// materialized, as a multiple of the viewport extent on each side.
    /// 0.0 renders exactly the visible overlap; larger values trade memory
    /// for smoother scrolling.
    pub offscreen_to_viewport_ratio: f64,

    /// Item index to anchor the very first render window on.
    pub initial_item_index: Option<usize>,

    /// Minimum interval between scroll-triggered recomputes. Scroll events
    /// inside the window coalesce into a single deferred recompute.
    pub scroll_throttle: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            assumed_item_height: 200.0,
            offscreen_to_viewport_ratio: 1.8,
            initial_item_index: None,
            scroll_throttle: Duration::from_millis(100),
        }
    }
}

impl EngineConfig {
    /// Set the fallback height for unmeasured items.
    #[must_use]
    pub fn with_assumed_item_height(mut self, height: f64) -> Self {
        self.assumed_item_height = height;
        self
    }

    /// Set the offscreen prefetch ratio.
    #[must_use]
    pub fn with_offscreen_ratio(mut self, ratio: f64) -> Self {
        self.offscreen_to_viewport_ratio = ratio;
        self
    }

    /// Anchor the first render window on `index`.
    #[must_use]
    pub fn with_initial_item_index(mut self, index: usize) -> Self {
        self.initial_item_index = Some(index);
        self
    }

    /// Set the scroll throttle interval.
    #[must_use]
    pub fn with_scroll_throttle(mut self, interval: Duration) -> Self {
        self.scroll_throttle = interval;
        self
    }
}
