use alloc::vec::Vec;

/// Scroll axis of a windowing calculator. Rows use `Vertical`, columns use `Horizontal`; the math
/// is identical for both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// A half-open index range `[start_index, end_index)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl VisibleRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualItem {
    pub index: usize,
    /// Start offset along the axis (includes `padding_start`).
    pub start: u64,
    pub size: u32,
}

impl VirtualItem {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}

/// The output of a windowing pass: the overscanned items in index order.
///
/// `visible` is the strictly visible range; `range` is `visible` widened by overscan and clamped
/// to `[0, count)`. `items` covers exactly `range`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualWindow {
    pub visible: VisibleRange,
    pub range: VisibleRange,
    pub items: Vec<VirtualItem>,
}

impl VirtualWindow {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, VirtualItem> {
        self.items.iter()
    }

    /// Pixel span `[start, end)` covered by the window, or `None` when empty.
    pub fn span(&self) -> Option<(u64, u64)> {
        let first = self.items.first()?;
        let last = self.items.last()?;
        Some((first.start, last.end()))
    }
}

impl<'a> IntoIterator for &'a VirtualWindow {
    type Item = &'a VirtualItem;
    type IntoIter = core::slice::Iter<'a, VirtualItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
