//! Viewport windowing engine for long, variable-height item lists.
//!
//! Rendering every item of a long feed is wasteful; this crate maintains
//! the small contiguous slice worth materializing near the viewport and
//! tells the host how much blank extent to reserve on either side so
//! native scroll geometry stays intact. Heights are measured lazily by the
//! host and fed back as they become known; the engine compensates scroll
//! position when late measurements shift content above the viewport.
//!
//! The engine is single-threaded and host-agnostic: it never touches a
//! DOM, a terminal, or a GUI toolkit. The host owns rendering and scroll
//! state and drives the engine through a small frame protocol:
//!
//! ```
//! use viewslice_engine::{
//!     EngineConfig, NullScrollEffector, ViewportInset, WindowEngine,
//! };
//! use web_time::Instant;
//!
//! let mut engine = WindowEngine::new(
//!     EngineConfig::default().with_assumed_item_height(50.0),
//! );
//! engine.set_items(0u64..1000);
//!
//! // Frame tick: settle, render the snapshot, then finish.
//! let now = Instant::now();
//! if engine.needs_frame(now) {
//!     let snapshot = engine
//!         .settle(ViewportInset::new(0.0, 600.0), now)
//!         .expect("engine not disposed");
//!     // ... materialize snapshot.slice, reserve snapshot.blank_above
//!     //     and snapshot.blank_below ...
//!     engine.finish_render(&mut NullScrollEffector);
//!     assert!(!snapshot.slice.is_empty());
//! }
//! ```
//!
//! Measured heights arrive whenever the host observes them:
//!
//! ```
//! # use viewslice_engine::WindowEngine;
//! # let mut engine: WindowEngine<u64> = WindowEngine::with_defaults();
//! # engine.set_items(0u64..10);
//! engine.report_heights([(0u64, 137.5), (1u64, 88.0)]);
//! ```
//!
//! Layout math (height caching, prefix-sum insets, slice selection) lives
//! in [`viewslice_core`] and is re-exported here for convenience.

#![forbid(unsafe_code)]

mod anchor;
mod config;
mod engine;
mod host;
mod scheduler;

pub use anchor::{ScrollAnchor, SlicePlan, compensation_delta, plan_items_change};
pub use config::EngineConfig;
pub use engine::{FrameStats, WindowEngine, WindowSnapshot};
pub use host::{NullScrollEffector, ScrollEffector};
pub use scheduler::RenderPhase;

pub use viewslice_core::{
    BlankSpace, BlockInset, BlockInsets, HeightCache, Slice, ViewportInset,
};
