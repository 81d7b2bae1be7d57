//! A headless virtual table engine.
//!
//! Builds on [`vtable_window`] (the 1-D windowing calculator) and adds everything between raw
//! rows and pixels:
//!
//! - a sort → search → selection → advanced filter pipeline, stage by stage server-delegable
//! - row flattening with expandable detail rows (`O(log n)` toggles)
//! - checkbox selection with a select-all complement set, and a single active row
//! - column layout: stretch-to-fill, resize, frozen offsets and grouped headers
//!
//! [`Table`] ties the parts together as one explicit state store. It does not render anything;
//! hosts feed it viewport sizes and scroll events and draw [`RowWindow`] / [`ColumnWindow`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod callbacks;
mod columns;
mod error;
mod filter;
mod flatten;
mod key;
mod measure;
mod options;
mod scroll;
mod selection;
mod table;
mod value;

#[cfg(test)]
mod tests;

pub use callbacks::{
    FilterCallbacks, OnAdvanceChangeCallback, OnCheckboxSelectionCallback, OnRowAtCallback,
    OnRowCallback, OnScrollCallback, OnSearchChangeCallback, OnSelectionChangeCallback,
    OnSortChangeCallback, OnTouchBottomCallback, Position, TableCallbacks,
};
pub use columns::{
    ColumnLayout, ColumnVisibility, Freeze, Group, HeaderNode, Leaf, ResizeOutcome,
    ResizeSession, validate_headers,
};
pub use error::{Error, Result};
pub use filter::{
    AdvancedCriterion, AdvancedFilter, FilterOperator, FilterState, Pipeline, SearchFilter,
    SelectionFilter, SortDirection, SortState, Stage,
};
pub use flatten::{FlatItem, FlatKind, Flattened, flatten};
pub use key::{KeySet, RowKey};
pub use measure::{MeasurementProvider, Viewport};
pub use options::{ServerDelegation, TableOptions};
pub use scroll::BottomDetector;
pub use selection::{ActiveRow, SelectionState};
pub use table::{
    ColumnSlot, ColumnWindow, FrozenColumn, KeySource, RowKeyFn, RowSlot, RowWindow, Table,
};
pub use value::{Record, Value};

pub use vtable_window::{Align, Axis, VirtualItem, VirtualWindow, VisibleRange, Windowing};
