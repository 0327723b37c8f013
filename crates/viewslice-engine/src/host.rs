//! The narrow host-facing effect interface.
//!
//! The engine's only externally observable side effect is a relative scroll
//! correction. Keeping it behind a one-method trait makes corrections
//! trivially mockable: tests hand the engine a recording implementation and
//! assert on the deltas it received.

/// Performs a relative scroll of the host's scroll container.
pub trait ScrollEffector {
    /// Scroll the container by `delta` content units (positive = down).
    fn scroll_by(&mut self, delta: f64);
}

/// Discards corrections. Useful for hosts that drive a fully virtual
/// scroll position and apply published snapshots directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScrollEffector;

impl ScrollEffector for NullScrollEffector {
    fn scroll_by(&mut self, _delta: f64) {}
}

impl<T: ScrollEffector + ?Sized> ScrollEffector for &mut T {
    fn scroll_by(&mut self, delta: f64) {
        (**self).scroll_by(delta);
    }
}
