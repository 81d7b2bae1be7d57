use alloc::string::String;
use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

#[cfg(feature = "std")]
pub(crate) type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<K, V> = BTreeMap<K, V>;

/// Set of row keys (expanded rows, checkbox selection).
#[cfg(feature = "std")]
pub type KeySet = HashSet<RowKey>;
#[cfg(not(feature = "std"))]
pub type KeySet = BTreeSet<RowKey>;

/// Stable identity of a row, supplied by the caller.
///
/// Keys must be unique within the currently filtered collection. When they are not, lookups
/// resolve to the first row carrying the key; which row a toggle affects is otherwise
/// unspecified.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RowKey {
    Num(i64),
    Str(String),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowKey {
    fn from(v: i64) -> Self {
        Self::Num(v)
    }
}

impl From<i32> for RowKey {
    fn from(v: i32) -> Self {
        Self::Num(v as i64)
    }
}

impl From<u32> for RowKey {
    fn from(v: u32) -> Self {
        Self::Num(v as i64)
    }
}

impl From<usize> for RowKey {
    fn from(v: usize) -> Self {
        Self::Num(v as i64)
    }
}

impl From<String> for RowKey {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for RowKey {
    fn from(v: &str) -> Self {
        Self::Str(String::from(v))
    }
}
