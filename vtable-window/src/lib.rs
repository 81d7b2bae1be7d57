//! A headless 1-D windowing calculator for virtualized tables.
//!
//! Given an item count, a per-item size estimate, a viewport extent and a scroll offset, this
//! crate answers which items are visible (plus overscan) and where each one starts, in
//! `O(log n + visible)` per query. Rows and columns use the same calculator with a different
//! [`Axis`].
//!
//! It is UI-agnostic. A rendering layer is expected to provide:
//! - viewport extent along the axis (`0` until measured)
//! - scroll offset
//! - item size estimates and (optionally) per-index size overrides, e.g. after a column resize
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod fenwick;
mod key;
mod options;
mod types;
mod windowing;


pub use fenwick::Fenwick;
pub use key::SizeOverrides;
pub use options::{EstimateSize, WindowOptions};
pub use types::{Align, Axis, ScrollDirection, VirtualItem, VirtualWindow, VisibleRange};
pub use windowing::{Windowing, compute_window};
