use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use super::header::{self, Freeze, HeaderNode, Leaf};
use super::resize::ResizeSession;
use crate::key::KeyMap;
use crate::{Result, Viewport};

#[derive(Clone, Debug)]
struct LeafSlot {
    top: usize,
    /// Declared or user-resized width, before stretch.
    base: u32,
    min_width: u32,
    no_stretch: bool,
}

#[derive(Clone, Debug)]
struct TopSlot {
    freeze: Freeze,
    visible: bool,
    leaves: Range<usize>,
}

#[derive(Clone, Debug)]
struct Span {
    leaves: Range<usize>,
    is_leaf: bool,
}

/// `(key, caption, visible)` of a top-level column, for a column picker.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnVisibility {
    pub key: String,
    pub caption: String,
    pub visible: bool,
}

/// Where a committed resize landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeOutcome {
    /// Top-level column containing the resized leaf.
    pub top: usize,
    pub width: u32,
    /// Change of the leaf's base width.
    pub delta: i64,
}

/// Column geometry: partition by freeze, stretch-to-fill, resize overrides and sticky offsets.
///
/// Leaves are stored in depth-first order so every group covers a contiguous leaf range and its
/// width is a range sum.
#[derive(Clone, Debug)]
pub struct ColumnLayout {
    headers: Vec<HeaderNode>,
    leaves: Vec<LeafSlot>,
    tops: Vec<TopSlot>,
    spans: KeyMap<String, Span>,
    widths: Vec<u32>,
    freeze_left: Vec<usize>,
    freeze_right: Vec<usize>,
    scrollable: Vec<usize>,
    left_offsets: Vec<u32>,
    right_offsets: Vec<u32>,
    depth: usize,
    viewport: Viewport,
}

impl ColumnLayout {
    /// Validates `headers` and lays them out for an unmeasured viewport.
    pub fn new(
        headers: Vec<HeaderNode>,
        default_width: u32,
        default_min_width: u32,
    ) -> Result<Self> {
        header::validate_headers(&headers)?;
        let mut leaves = Vec::new();
        let mut tops = Vec::with_capacity(headers.len());
        let mut spans = KeyMap::default();
        for (top, node) in headers.iter().enumerate() {
            let start = leaves.len();
            index_node(node, top, default_width, default_min_width, &mut leaves, &mut spans);
            tops.push(TopSlot {
                freeze: node.freeze(),
                visible: node.is_visible(),
                leaves: start..leaves.len(),
            });
        }
        let widths = leaves.iter().map(|l| l.base).collect();
        let mut layout = Self {
            headers,
            leaves,
            tops,
            spans,
            widths,
            freeze_left: Vec::new(),
            freeze_right: Vec::new(),
            scrollable: Vec::new(),
            left_offsets: Vec::new(),
            right_offsets: Vec::new(),
            depth: 0,
            viewport: Viewport::default(),
        };
        layout.recompute();
        Ok(layout)
    }

    pub fn headers(&self) -> &[HeaderNode] {
        &self.headers
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Re-runs partition, stretch and offsets for a new container size.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.recompute();
    }

    /// Whether `key` names a leaf or a group.
    pub fn contains(&self, key: &str) -> bool {
        self.spans.contains_key(key)
    }

    pub fn leaf(&self, key: &str) -> Option<&Leaf> {
        self.headers.iter().find_map(|h| h.find_leaf(key))
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn top_count(&self) -> usize {
        self.tops.len()
    }

    /// Visible left-frozen top-level indexes, in declaration order.
    pub fn freeze_left(&self) -> &[usize] {
        &self.freeze_left
    }

    pub fn freeze_right(&self) -> &[usize] {
        &self.freeze_right
    }

    /// Visible unfrozen top-level indexes; these are the items of the column window.
    pub fn scrollable(&self) -> &[usize] {
        &self.scrollable
    }

    /// Sticky `left` of each [`Self::freeze_left`] column.
    pub fn left_offsets(&self) -> &[u32] {
        &self.left_offsets
    }

    /// Sticky `right` of each [`Self::freeze_right`] column.
    pub fn right_offsets(&self) -> &[u32] {
        &self.right_offsets
    }

    pub fn freeze_left_width(&self) -> u32 {
        self.freeze_left.iter().map(|&t| self.top_width(t)).sum()
    }

    pub fn freeze_right_width(&self) -> u32 {
        self.freeze_right.iter().map(|&t| self.top_width(t)).sum()
    }

    /// Effective width of a top-level column (sum of its leaves).
    pub fn top_width(&self, top: usize) -> u32 {
        self.tops
            .get(top)
            .map_or(0, |t| self.widths[t.leaves.clone()].iter().sum())
    }

    pub fn top_key(&self, top: usize) -> Option<&str> {
        self.headers.get(top).map(HeaderNode::key)
    }

    /// Effective width of any header, leaf or group.
    pub fn width_of(&self, key: &str) -> Option<u32> {
        self.spans
            .get(key)
            .map(|s| self.widths[s.leaves.clone()].iter().sum())
    }

    /// Width before stretch (declared, or the last committed resize).
    pub fn base_width(&self, key: &str) -> Option<u32> {
        self.spans
            .get(key)
            .map(|s| self.leaves[s.leaves.clone()].iter().map(|l| l.base).sum())
    }

    pub fn is_no_stretch(&self, key: &str) -> Option<bool> {
        self.leaf_slot(key).map(|i| self.leaves[i].no_stretch)
    }

    /// Widths of the scrollable columns, indexed like [`Self::scrollable`].
    pub fn scrollable_widths(&self) -> Vec<u32> {
        self.scrollable.iter().map(|&t| self.top_width(t)).collect()
    }

    /// Index of a top-level column within [`Self::scrollable`].
    pub fn scrollable_index(&self, top: usize) -> Option<usize> {
        self.scrollable.iter().position(|&t| t == top)
    }

    /// Sticky placement and offset of a visible frozen top-level column.
    pub fn sticky_offset(&self, top: usize) -> Option<(Freeze, u32)> {
        if let Some(i) = self.freeze_left.iter().position(|&t| t == top) {
            return Some((Freeze::Left, self.left_offsets[i]));
        }
        self.freeze_right
            .iter()
            .position(|&t| t == top)
            .map(|i| (Freeze::Right, self.right_offsets[i]))
    }

    /// Deepest grouping level among visible top-level columns.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_visible(&self, key: &str) -> Option<bool> {
        self.top_index(key).map(|t| self.tops[t].visible)
    }

    /// Shows or hides a top-level column. Returns `None` for unknown or nested keys.
    pub fn set_visible(&mut self, key: &str, visible: bool) -> Option<bool> {
        let top = self.top_index(key)?;
        if self.tops[top].visible != visible {
            self.tops[top].visible = visible;
            self.headers[top].set_visible(visible);
            self.recompute();
        }
        Some(visible)
    }

    pub fn toggle_visibility(&mut self, key: &str) -> Option<bool> {
        let visible = !self.is_visible(key)?;
        self.set_visible(key, visible)
    }

    pub fn visibility_list(&self) -> Vec<ColumnVisibility> {
        self.headers
            .iter()
            .zip(&self.tops)
            .map(|(h, t)| ColumnVisibility {
                key: String::from(h.key()),
                caption: String::from(h.caption()),
                visible: t.visible,
            })
            .collect()
    }

    /// Starts a drag on the edge of leaf `key` from its current effective width.
    pub fn begin_resize(&self, key: &str) -> Option<ResizeSession> {
        let i = self.leaf_slot(key)?;
        Some(ResizeSession::new(key, self.widths[i], self.leaves[i].min_width))
    }

    /// Commits a resize: the leaf keeps `width` (clamped to its minimum) and stops stretching.
    ///
    /// Declared widths are taken as given; the minimum only bounds user resizes.
    pub fn commit_resize(&mut self, key: &str, width: u32) -> Option<ResizeOutcome> {
        let i = self.leaf_slot(key)?;
        let slot = &mut self.leaves[i];
        let width = width.max(slot.min_width);
        let delta = width as i64 - slot.base as i64;
        slot.base = width;
        slot.no_stretch = true;
        let top = slot.top;
        vtrace!(key, width, delta, "column resized");
        self.recompute();
        Some(ResizeOutcome { top, width, delta })
    }

    pub fn end_resize(&mut self, session: ResizeSession) -> Option<ResizeOutcome> {
        self.commit_resize(session.key(), session.width())
    }

    /// Restores declared widths and stretch eligibility.
    pub fn reset_sizes(&mut self, default_width: u32) {
        let declared: Vec<(Option<u32>, bool)> = self
            .headers
            .iter()
            .flat_map(|node| node.leaves())
            .map(|leaf| (leaf.width, leaf.no_stretch))
            .collect();
        for (slot, (width, no_stretch)) in self.leaves.iter_mut().zip(declared) {
            slot.base = width.unwrap_or(default_width);
            slot.no_stretch = no_stretch;
        }
        self.recompute();
    }

    fn top_index(&self, key: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.key() == key)
    }

    fn leaf_slot(&self, key: &str) -> Option<usize> {
        let span = self.spans.get(key)?;
        span.is_leaf.then_some(span.leaves.start)
    }

    fn recompute(&mut self) {
        self.freeze_left.clear();
        self.freeze_right.clear();
        self.scrollable.clear();
        self.depth = 0;
        for (i, top) in self.tops.iter().enumerate() {
            if !top.visible {
                continue;
            }
            self.depth = self.depth.max(self.headers[i].depth());
            match top.freeze {
                Freeze::Left => self.freeze_left.push(i),
                Freeze::Right => self.freeze_right.push(i),
                Freeze::None => self.scrollable.push(i),
            }
        }

        for (w, l) in self.widths.iter_mut().zip(&self.leaves) {
            *w = l.base;
        }
        self.stretch();

        let mut acc = 0u32;
        self.left_offsets.clear();
        for &t in &self.freeze_left {
            self.left_offsets.push(acc);
            acc = acc.saturating_add(self.top_width(t));
        }
        let mut acc = 0u32;
        self.right_offsets = alloc::vec![0; self.freeze_right.len()];
        for (i, &t) in self.freeze_right.iter().enumerate().rev() {
            self.right_offsets[i] = acc;
            acc = acc.saturating_add(self.top_width(t));
        }
        vdebug!(
            left = self.freeze_left.len(),
            right = self.freeze_right.len(),
            scrollable = self.scrollable.len(),
            depth = self.depth,
            "column layout recomputed"
        );
    }

    /// Equal-share fill of the leftover container width across stretch-eligible scrollable
    /// leaves. Leftover pixels of the integer split go to the leftmost eligible leaves.
    fn stretch(&mut self) {
        if self.viewport.width == 0 {
            return;
        }
        let frozen = self.freeze_left_width() as u64 + self.freeze_right_width() as u64;
        let usable = (self.viewport.content_width() as u64).saturating_sub(frozen);

        let mut eligible = Vec::new();
        let mut fixed = 0u64;
        for &t in &self.scrollable {
            for i in self.tops[t].leaves.clone() {
                if self.leaves[i].no_stretch {
                    fixed += self.leaves[i].base as u64;
                } else {
                    eligible.push(i);
                }
            }
        }
        let declared: u64 = eligible.iter().map(|&i| self.leaves[i].base as u64).sum();
        let available = usable.saturating_sub(fixed);
        if eligible.is_empty() || available <= declared {
            return;
        }
        let extra = available - declared;
        let n = eligible.len() as u64;
        let (share, remainder) = (extra / n, extra % n);
        for (k, &i) in eligible.iter().enumerate() {
            let bonus = share + u64::from((k as u64) < remainder);
            self.widths[i] = self.leaves[i].base.saturating_add(bonus as u32);
        }
        vtrace!(extra, columns = n, "stretched columns");
    }
}

fn index_node(
    node: &HeaderNode,
    top: usize,
    default_width: u32,
    default_min_width: u32,
    leaves: &mut Vec<LeafSlot>,
    spans: &mut KeyMap<String, Span>,
) {
    let start = leaves.len();
    match node {
        HeaderNode::Leaf(l) => {
            let min_width = l.min_width.unwrap_or(default_min_width);
            leaves.push(LeafSlot {
                top,
                base: l.width.unwrap_or(default_width),
                min_width,
                no_stretch: l.no_stretch,
            });
        }
        HeaderNode::Group(g) => {
            for child in &g.children {
                index_node(child, top, default_width, default_min_width, leaves, spans);
            }
        }
    }
    spans.insert(
        String::from(node.key()),
        Span {
            leaves: start..leaves.len(),
            is_leaf: matches!(node, HeaderNode::Leaf(_)),
        },
    );
}
