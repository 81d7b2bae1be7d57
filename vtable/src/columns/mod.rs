//! Column geometry.

mod header;
mod layout;
mod resize;

pub use header::{Freeze, Group, HeaderNode, Leaf, validate_headers};
pub use layout::{ColumnLayout, ColumnVisibility, ResizeOutcome};
pub use resize::ResizeSession;
