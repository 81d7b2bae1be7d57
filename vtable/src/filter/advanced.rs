use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::key::KeyMap;
use crate::{Error, Record};

/// Operator of an advanced (per-column) filter.
///
/// `None` is the pass-through operator: a criterion carrying it is never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum FilterOperator {
    #[default]
    None,
    Equal,
    NotEqual,
    StartsWith,
    EndsWith,
    Contains,
    NotContains,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 7] = [
        Self::None,
        Self::Equal,
        Self::NotEqual,
        Self::StartsWith,
        Self::EndsWith,
        Self::Contains,
        Self::NotContains,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
        }
    }

    /// Parses an operator name, mapping anything unrecognized to `None` (pass-through).
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Evaluates the operator; both sides are expected to be lowercased already.
    pub fn test(self, cell: &str, value: &str) -> bool {
        match self {
            Self::None => true,
            Self::Equal => cell == value,
            Self::NotEqual => cell != value,
            Self::StartsWith => cell.starts_with(value),
            Self::EndsWith => cell.ends_with(value),
            Self::Contains => cell.contains(value),
            Self::NotContains => !cell.contains(value),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::UnknownOperator(String::from(s)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvancedCriterion {
    pub operator: FilterOperator,
    pub value: String,
}

impl AdvancedCriterion {
    pub fn new(operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }
}

/// Per-column operator filters, compared case-insensitively.
///
/// A `Null` cell compares as the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdvancedFilter {
    criteria: KeyMap<String, AdvancedCriterion>,
}

impl AdvancedFilter {
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn get(&self, column: &str) -> Option<&AdvancedCriterion> {
        self.criteria.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AdvancedCriterion)> {
        self.criteria.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Stores `criterion` for `column`; the `None` operator removes the entry instead.
    pub fn set(&mut self, column: &str, criterion: AdvancedCriterion) -> bool {
        if criterion.operator == FilterOperator::None {
            return self.remove(column);
        }
        if self.criteria.get(column) == Some(&criterion) {
            return false;
        }
        self.criteria.insert(String::from(column), criterion);
        true
    }

    pub fn remove(&mut self, column: &str) -> bool {
        self.criteria.remove(column).is_some()
    }

    pub fn clear(&mut self) {
        self.criteria.clear();
    }

    pub fn apply<T: Record>(&self, data: &[T], rows: &[usize]) -> Vec<usize> {
        if self.criteria.is_empty() {
            return rows.to_vec();
        }
        let tests: Vec<(&str, FilterOperator, String)> = self
            .criteria
            .iter()
            .map(|(column, c)| (column.as_str(), c.operator, c.value.to_lowercase()))
            .collect();
        rows.iter()
            .copied()
            .filter(|&row| {
                tests.iter().all(|(column, op, value)| {
                    let cell = data[row].field(column).to_lowercase().unwrap_or_default();
                    op.test(&cell, value)
                })
            })
            .collect()
    }
}
