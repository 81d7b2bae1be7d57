#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Per-index size overrides (index → size in px).
///
/// An override replaces the estimator's value for that index until it is cleared.
#[cfg(feature = "std")]
pub type SizeOverrides = HashMap<usize, u32>;
#[cfg(not(feature = "std"))]
pub type SizeOverrides = BTreeMap<usize, u32>;
