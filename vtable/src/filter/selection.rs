use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use crate::Record;
use crate::key::KeyMap;

/// Per-column membership filter against a set of allowed raw values.
///
/// Comparison is type-aware: numeric cells parse the allowed values as numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionFilter {
    allowed: KeyMap<String, BTreeSet<String>>,
}

impl SelectionFilter {
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn get(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.allowed.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.allowed.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replaces the allowed values for `column`. An empty set removes the entry.
    pub fn set<I, S>(&mut self, column: &str, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return self.remove(column);
        }
        if self.allowed.get(column) == Some(&values) {
            return false;
        }
        self.allowed.insert(String::from(column), values);
        true
    }

    pub fn remove(&mut self, column: &str) -> bool {
        self.allowed.remove(column).is_some()
    }

    pub fn clear(&mut self) {
        self.allowed.clear();
    }

    pub fn apply<T: Record>(&self, data: &[T], rows: &[usize]) -> Vec<usize> {
        if self.allowed.is_empty() {
            return rows.to_vec();
        }
        rows.iter()
            .copied()
            .filter(|&row| {
                self.allowed.iter().all(|(column, values)| {
                    let cell = data[row].field(column);
                    values.iter().any(|v| cell.matches_option(v))
                })
            })
            .collect()
    }
}
