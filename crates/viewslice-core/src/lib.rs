#![forbid(unsafe_code)]

//! Core windowing primitives for Viewslice.
//!
//! Viewslice renders only a bounded slice of a long, variable-height item
//! list. This crate holds the pure layout math that makes that possible:
//!
//! - [`HeightCache`] - id-keyed measured heights with an assumed fallback
//! - [`BlockInsets`] - prefix-sum `[top, bottom)` extents per item
//! - [`Slice`] - the contiguous index range currently materialized
//! - [`BlankSpace`] - how much unrendered extent to reserve above/below
//!
//! Nothing here knows about a host renderer, a clock, or scheduling; those
//! live in `viewslice-engine`. All extents and offsets are `f64` values in
//! a caller-chosen 1D coordinate space (typically logical pixels) with 0 at
//! the top of the first item.
//!
//! # Example
//!
//! ```
//! use viewslice_core::{BlockInsets, HeightCache, Slice, ViewportInset};
//!
//! let mut heights = HeightCache::new(50.0);
//! heights.merge([(1u64, 80.0)]);
//!
//! let ids = [0u64, 1, 2, 3];
//! let insets = BlockInsets::compute(ids.iter(), &heights);
//! assert_eq!(insets.total_extent(), 50.0 + 80.0 + 50.0 + 50.0);
//!
//! let viewport = ViewportInset::new(0.0, 100.0);
//! let slice = Slice::select(&insets, viewport, 0.0);
//! assert_eq!(slice, Slice::new(0, 2));
//! ```

mod height_cache;
mod inset;
mod slice;

pub use height_cache::HeightCache;
pub use inset::{BlankSpace, BlockInset, BlockInsets, ViewportInset};
pub use slice::Slice;
