use alloc::vec::Vec;
use core::cmp;

/// A Fenwick (binary indexed) tree over `u64` values.
///
/// Supports point updates, prefix sums and "how many leading values fit under a target" queries
/// in `O(log n)`. The windowing calculator uses it for item offsets; other layers reuse it for
/// any per-index span bookkeeping (e.g. rows that occupy one or two flattened slots).
#[derive(Clone, Debug, Default)]
pub struct Fenwick {
    tree: Vec<u64>, // 1-indexed, tree[0] unused
    total: u64,
    top_bit: usize,
}

impl Fenwick {
    /// Creates a tree of `n` zeros.
    pub fn new(n: usize) -> Self {
        Self {
            tree: alloc::vec![0; n + 1],
            total: 0,
            top_bit: top_bit_for(n),
        }
    }

    /// Builds a tree from per-index values in `O(n)`.
    pub fn from_values(values: impl IntoIterator<Item = u64>) -> Self {
        let mut tree = Vec::new();
        tree.push(0u64);
        let mut total = 0u64;
        for v in values {
            total = total.saturating_add(v);
            tree.push(v);
        }
        let n = tree.len() - 1;
        for i in 1..=n {
            let parent = i + lowbit(i);
            if parent <= n {
                tree[parent] = tree[parent].saturating_add(tree[i]);
            }
        }
        Self {
            tree,
            total,
            top_bit: top_bit_for(n),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all values.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Adds `delta` to the value at `index`. Out-of-range indexes are ignored.
    pub fn add(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n || delta == 0 {
            return;
        }
        self.total = apply_delta(self.total, delta);
        let mut i = index + 1;
        while i <= n {
            debug_assert!(
                delta >= 0 || self.tree[i] >= delta.unsigned_abs(),
                "Fenwick underflow at node {i} (delta={delta})"
            );
            self.tree[i] = apply_delta(self.tree[i], delta);
            i += lowbit(i);
        }
    }

    /// Sum of the first `count` values (clamped to `len`).
    pub fn prefix_sum(&self, count: usize) -> u64 {
        let mut i = cmp::min(count, self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.tree[i]);
            i &= i - 1;
        }
        sum
    }

    /// Returns the number of leading values whose running sum stays `<= target`.
    ///
    /// For item sizes this maps an offset to the index of the item covering it: the item at
    /// `lower_bound(offset)` is the first one whose end lies strictly after `offset`.
    pub fn lower_bound(&self, mut target: u64) -> usize {
        let n = self.len();
        let mut pos = 0usize;
        let mut step = self.top_bit;
        while step != 0 {
            let next = pos + step;
            if next <= n && self.tree[next] <= target {
                target -= self.tree[next];
                pos = next;
            }
            step >>= 1;
        }
        pos
    }
}

fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn top_bit_for(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut p = 1usize;
    while p <= n / 2 {
        p <<= 1;
    }
    p
}
