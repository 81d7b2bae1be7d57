//! Row + expanded-detail flattening.
//!
//! The flat sequence is never materialized. Each data row owns a span of one item, or two when
//! expanded, and a Fenwick tree over the spans maps between flat indexes and row ordinals, so a
//! toggle is an `O(log n)` point update instead of a splice.

use alloc::vec::Vec;

use vtable_window::Fenwick;

use crate::key::KeyMap;
use crate::{KeySet, RowKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlatKind {
    Row,
    Expanded,
}

/// One entry of the flattened sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlatItem<'a> {
    pub kind: FlatKind,
    pub key: &'a RowKey,
    /// Index into the source data.
    pub row: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Flattened {
    rows: Vec<usize>,
    keys: Vec<RowKey>,
    expanded: Vec<bool>,
    spans: Fenwick,
    ordinals: KeyMap<RowKey, usize>,
}

impl Flattened {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens `rows` (source indexes, in display order) with their `keys`.
    ///
    /// With duplicate keys the first row wins: only it can be looked up, toggled or expanded.
    pub fn build(rows: Vec<usize>, keys: Vec<RowKey>, expanded_keys: &KeySet) -> Self {
        debug_assert_eq!(rows.len(), keys.len());
        let mut ordinals = KeyMap::default();
        let mut expanded = Vec::with_capacity(keys.len());
        let mut duplicates = 0usize;
        for (ordinal, key) in keys.iter().enumerate() {
            let first = !ordinals.contains_key(key);
            if first {
                ordinals.insert(key.clone(), ordinal);
            } else {
                duplicates += 1;
            }
            expanded.push(first && expanded_keys.contains(key));
        }
        if duplicates > 0 {
            vwarn!(duplicates, "duplicate row keys; first occurrence wins");
        }
        let spans = Fenwick::from_values(expanded.iter().map(|&e| span(e)));
        vdebug!(rows = rows.len(), flat = spans.total(), "flattened");
        Self {
            rows,
            keys,
            expanded,
            spans,
            ordinals,
        }
    }

    /// Number of flat items (rows plus expanded details).
    pub fn len(&self) -> usize {
        self.spans.total() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn keys(&self) -> &[RowKey] {
        &self.keys
    }

    /// Per-ordinal expansion flags.
    pub fn expanded_flags(&self) -> &[bool] {
        &self.expanded
    }

    pub fn get(&self, index: usize) -> Option<FlatItem<'_>> {
        if index >= self.len() {
            return None;
        }
        let ordinal = self.spans.lower_bound(index as u64);
        let start = self.spans.prefix_sum(ordinal) as usize;
        let kind = if index == start {
            FlatKind::Row
        } else {
            FlatKind::Expanded
        };
        Some(FlatItem {
            kind,
            key: &self.keys[ordinal],
            row: self.rows[ordinal],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = FlatItem<'_>> + '_ {
        self.rows
            .iter()
            .zip(&self.keys)
            .zip(&self.expanded)
            .flat_map(|((&row, key), &expanded)| {
                let head = FlatItem {
                    kind: FlatKind::Row,
                    key,
                    row,
                };
                let detail = expanded.then_some(FlatItem {
                    kind: FlatKind::Expanded,
                    key,
                    row,
                });
                core::iter::once(head).chain(detail)
            })
    }

    pub fn to_vec(&self) -> Vec<FlatItem<'_>> {
        self.iter().collect()
    }

    /// Display ordinal of the (first) row with `key`.
    pub fn ordinal_of(&self, key: &RowKey) -> Option<usize> {
        self.ordinals.get(key).copied()
    }

    /// Flat index of the `Row` entry for `key`.
    pub fn flat_index_of(&self, key: &RowKey) -> Option<usize> {
        self.ordinal_of(key).map(|o| self.flat_index_of_ordinal(o))
    }

    pub fn flat_index_of_ordinal(&self, ordinal: usize) -> usize {
        self.spans.prefix_sum(ordinal) as usize
    }

    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.ordinal_of(key).is_some_and(|o| self.expanded[o])
    }

    /// Flips expansion of `key`. Returns the new state, or `None` if no row carries the key.
    pub fn toggle(&mut self, key: &RowKey) -> Option<bool> {
        let ordinal = self.ordinal_of(key)?;
        let next = !self.expanded[ordinal];
        self.set_ordinal(ordinal, next);
        Some(next)
    }

    /// Sets expansion of `key`. Returns `true` if the state changed.
    pub fn set_expanded(&mut self, key: &RowKey, expanded: bool) -> bool {
        match self.ordinal_of(key) {
            Some(ordinal) if self.expanded[ordinal] != expanded => {
                self.set_ordinal(ordinal, expanded);
                true
            }
            _ => false,
        }
    }

    /// Collapses every row.
    pub fn collapse_all(&mut self) {
        if self.expanded.iter().any(|&e| e) {
            self.expanded.iter_mut().for_each(|e| *e = false);
            self.spans = Fenwick::from_values(self.expanded.iter().map(|_| 1));
        }
    }

    fn set_ordinal(&mut self, ordinal: usize, expanded: bool) {
        self.expanded[ordinal] = expanded;
        self.spans.add(ordinal, if expanded { 1 } else { -1 });
        vtrace!(ordinal, expanded, "row expansion toggled");
    }
}

impl PartialEq for Flattened {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.keys == other.keys && self.expanded == other.expanded
    }
}

impl Eq for Flattened {}

/// Flattens a row collection in one pass; `key_of` receives the row and its source index.
pub fn flatten<T>(
    data: &[T],
    rows: &[usize],
    expanded_keys: &KeySet,
    key_of: impl Fn(&T, usize) -> RowKey,
) -> Flattened {
    let keys = rows.iter().map(|&r| key_of(&data[r], r)).collect();
    Flattened::build(rows.to_vec(), keys, expanded_keys)
}

fn span(expanded: bool) -> u64 {
    if expanded { 2 } else { 1 }
}
