use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::{Error, Record};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    Asc,
    Desc,
    #[default]
    Unset,
}

impl SortDirection {
    /// Next state of the header-click cycle: `unset → asc → desc → unset`.
    pub fn next(self) -> Self {
        match self {
            Self::Unset => Self::Asc,
            Self::Asc => Self::Desc,
            Self::Desc => Self::Unset,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::Unset => "unset",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            "unset" | "" => Ok(Self::Unset),
            other => Err(Error::UnknownSortDirection(String::from(other))),
        }
    }
}

/// Single-column sort criterion.
///
/// Invariant: `column` is `None` exactly when `direction` is `Unset`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortState {
    column: Option<String>,
    direction: SortDirection,
}

impl SortState {
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn is_active(&self) -> bool {
        self.column.is_some()
    }

    /// Header click: advances the cycle for the active column, or starts a new column at `Asc`.
    pub fn cycle(&mut self, column: &str) -> SortDirection {
        let next = if self.column.as_deref() == Some(column) {
            self.direction.next()
        } else {
            SortDirection::Asc
        };
        self.set(column, next);
        next
    }

    /// Sets the direction directly, bypassing the cycle (column action menu).
    pub fn set(&mut self, column: &str, direction: SortDirection) {
        self.direction = direction;
        self.column = match direction {
            SortDirection::Unset => None,
            _ => Some(String::from(column)),
        };
    }

    pub fn clear(&mut self) {
        self.column = None;
        self.direction = SortDirection::Unset;
    }

    /// Stable sort of `rows` (indexes into `data`) by the active column.
    pub fn apply<T: Record>(&self, data: &[T], rows: &[usize]) -> Vec<usize> {
        let mut out = rows.to_vec();
        let Some(column) = self.column.as_deref() else {
            return out;
        };
        let desc = self.direction == SortDirection::Desc;
        out.sort_by(|&a, &b| {
            let ord = data[a].field(column).sort_cmp(&data[b].field(column));
            if desc { ord.reverse() } else { ord }
        });
        out
    }
}
