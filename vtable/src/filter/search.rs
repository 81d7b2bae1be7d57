use alloc::string::String;
use alloc::vec::Vec;

use crate::Record;
use crate::key::KeyMap;

/// Per-column, case-insensitive substring search.
///
/// Only columns with a non-empty term are stored; terms across columns are ANDed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilter {
    terms: KeyMap<String, String>,
}

impl SearchFilter {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets the term for `column`. An empty term removes the column's entry.
    ///
    /// Returns `true` when the stored criterion changed.
    pub fn set(&mut self, column: &str, term: &str) -> bool {
        if term.is_empty() {
            return self.remove(column);
        }
        if self.terms.get(column).map(String::as_str) == Some(term) {
            return false;
        }
        self.terms.insert(String::from(column), String::from(term));
        true
    }

    pub fn remove(&mut self, column: &str) -> bool {
        self.terms.remove(column).is_some()
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }

    pub fn apply<T: Record>(&self, data: &[T], rows: &[usize]) -> Vec<usize> {
        if self.terms.is_empty() {
            return rows.to_vec();
        }
        let needles: Vec<(&str, String)> = self
            .terms
            .iter()
            .map(|(column, term)| (column.as_str(), term.to_lowercase()))
            .collect();
        rows.iter()
            .copied()
            .filter(|&row| {
                needles.iter().all(|(column, needle)| {
                    data[row]
                        .field(column)
                        .to_lowercase()
                        .is_some_and(|hay| hay.contains(needle.as_str()))
                })
            })
            .collect()
    }
}
