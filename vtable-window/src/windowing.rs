use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp;

use crate::fenwick::Fenwick;
use crate::{
    Align, Axis, ScrollDirection, SizeOverrides, VirtualItem, VirtualWindow, VisibleRange,
    WindowOptions,
};

/// A headless 1-D windowing calculator.
///
/// Holds per-index sizes in a Fenwick tree so that, once built, every query is
/// `O(log n + visible)`:
/// - the caller reports viewport size and scroll offset,
/// - the calculator answers which indexes are visible (plus overscan) and where each one starts.
///
/// Sizes come from the estimator unless an index has a size override (see
/// [`Self::resize_item`]). Overrides survive count and estimator changes until cleared.
#[derive(Clone, Debug)]
pub struct Windowing {
    options: WindowOptions,
    viewport_size: u32,
    scroll_offset: u64,
    scroll_direction: Option<ScrollDirection>,

    sizes: Vec<u32>, // effective sizes: override if present, estimate otherwise
    overrides: SizeOverrides,
    sums: Fenwick,
}

impl Windowing {
    pub fn new(options: WindowOptions) -> Self {
        vdebug!(
            count = options.count,
            overscan = options.overscan,
            "Windowing::new"
        );
        let mut w = Self {
            options,
            viewport_size: 0,
            scroll_offset: 0,
            scroll_direction: None,
            sizes: Vec::new(),
            overrides: SizeOverrides::new(),
            sums: Fenwick::new(0),
        };
        w.rebuild_sizes();
        w
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    /// Replaces the options, rebuilding sizes only when `count` or the estimator changed.
    pub fn set_options(&mut self, options: WindowOptions) {
        let prev_count = self.options.count;
        let estimator_unchanged = Arc::ptr_eq(&self.options.estimate_size, &options.estimate_size);
        self.options = options;
        vtrace!(
            count = self.options.count,
            overscan = self.options.overscan,
            "Windowing::set_options"
        );
        if self.options.count != prev_count || !estimator_unchanged {
            self.rebuild_sizes();
        }
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut WindowOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn axis(&self) -> Axis {
        self.options.axis
    }

    pub fn overscan(&self) -> usize {
        self.options.overscan
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
    }

    pub fn set_padding(&mut self, padding_start: u32, padding_end: u32) {
        self.options.padding_start = padding_start;
        self.options.padding_end = padding_end;
    }

    pub fn viewport_size(&self) -> u32 {
        self.viewport_size
    }

    /// Sets the viewport extent along the axis. `0` means "not measured yet": every window query
    /// returns an empty result until a non-zero size is reported.
    pub fn set_viewport_size(&mut self, size: u32) {
        self.viewport_size = size;
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        if self.scroll_offset == offset {
            return;
        }
        let prev = self.scroll_offset;
        self.scroll_offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        vtrace!(offset, "Windowing::set_scroll_offset");
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    pub fn set_viewport_and_scroll(&mut self, viewport_size: u32, scroll_offset: u64) {
        self.set_viewport_size(viewport_size);
        self.set_scroll_offset(scroll_offset);
    }

    /// Changes the item count. Existing sizes are kept; new indexes use their override (if any)
    /// or the estimator. Overrides past the new count are dropped.
    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        if count < self.sizes.len() {
            self.sizes.truncate(count);
            self.overrides.retain(|&i, _| i < count);
        } else {
            self.sizes.reserve_exact(count - self.sizes.len());
            for i in self.sizes.len()..count {
                let size = self.size_from_source(i);
                self.sizes.push(size);
            }
        }
        self.rebuild_sums();
    }

    pub fn set_estimate_size(&mut self, f: impl Fn(usize) -> u32 + Send + Sync + 'static) {
        self.options.estimate_size = Arc::new(f);
        self.rebuild_sizes();
    }

    /// Permanently overrides the size of `index` (e.g. after a user resize).
    ///
    /// Runs in `O(log n)`. Returns the size delta that was applied, or `0` when `index` is out
    /// of range.
    pub fn resize_item(&mut self, index: usize, size: u32) -> i64 {
        if index >= self.options.count {
            return 0;
        }
        self.overrides.insert(index, size);
        self.set_size(index, size)
    }

    /// Applies several overrides at once.
    pub fn resize_items(&mut self, sizes: impl IntoIterator<Item = (usize, u32)>) -> i64 {
        let mut applied = 0i64;
        for (index, size) in sizes {
            applied += self.resize_item(index, size);
        }
        applied
    }

    /// Drops the override for `index`, restoring the estimator's value.
    ///
    /// Returns `false` when `index` had no override.
    pub fn clear_override(&mut self, index: usize) -> bool {
        if self.overrides.remove(&index).is_none() {
            return false;
        }
        if index < self.options.count {
            let size = (self.options.estimate_size)(index);
            self.set_size(index, size);
        }
        true
    }

    pub fn clear_overrides(&mut self) {
        if self.overrides.is_empty() {
            return;
        }
        self.overrides.clear();
        self.rebuild_sizes();
    }

    pub fn size_override(&self, index: usize) -> Option<u32> {
        self.overrides.get(&index).copied()
    }

    pub fn overrides(&self) -> &SizeOverrides {
        &self.overrides
    }

    pub fn total_size(&self) -> u64 {
        self.options.padding_start as u64 + self.sums.total() + self.options.padding_end as u64
    }

    pub fn item_start(&self, index: usize) -> Option<u64> {
        (index < self.options.count).then(|| self.start_of(index))
    }

    pub fn item_size(&self, index: usize) -> Option<u32> {
        self.sizes.get(index).copied()
    }

    pub fn item_end(&self, index: usize) -> Option<u64> {
        let start = self.item_start(index)?;
        let size = self.item_size(index)? as u64;
        Some(start.saturating_add(size))
    }

    pub fn item(&self, index: usize) -> Option<VirtualItem> {
        let size = self.item_size(index)?;
        Some(VirtualItem {
            index,
            start: self.start_of(index),
            size,
        })
    }

    /// Returns the index of the item covering `offset` (clamped into the list).
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        if self.options.count == 0 {
            return None;
        }
        Some(self.index_at_list_offset(offset))
    }

    /// Strictly visible range (no overscan) for the current scroll state.
    pub fn visible_range(&self) -> VisibleRange {
        self.visible_range_for(self.scroll_offset, self.viewport_size)
    }

    pub fn visible_range_for(&self, scroll_offset: u64, viewport_size: u32) -> VisibleRange {
        let count = self.options.count;
        if count == 0 || viewport_size == 0 {
            return VisibleRange::EMPTY;
        }

        let view = viewport_size as u64;
        let total = self.total_size();
        let offset = scroll_offset.min(total.saturating_sub(view));
        if offset >= total {
            return VisibleRange {
                start_index: count,
                end_index: count,
            };
        }
        let last_px = offset.saturating_add(view).saturating_sub(1);

        let start = self.index_at_list_offset(offset);
        let end = self
            .index_at_list_offset(cmp::max(last_px, offset))
            .saturating_add(1)
            .min(count);

        VisibleRange {
            start_index: start,
            end_index: end,
        }
    }

    /// Visible range widened by overscan on both sides, clamped to `[0, count)`.
    pub fn virtual_range(&self) -> VisibleRange {
        self.virtual_range_for(self.scroll_offset, self.viewport_size)
    }

    pub fn virtual_range_for(&self, scroll_offset: u64, viewport_size: u32) -> VisibleRange {
        let visible = self.visible_range_for(scroll_offset, viewport_size);
        self.overscanned(visible)
    }

    pub fn for_each_virtual_item(&self, f: impl FnMut(VirtualItem)) {
        self.for_each_virtual_item_for(self.scroll_offset, self.viewport_size, f);
    }

    /// Calls `f` for every overscanned item, in index order, without allocating.
    pub fn for_each_virtual_item_for(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        mut f: impl FnMut(VirtualItem),
    ) {
        let range = self.virtual_range_for(scroll_offset, viewport_size);
        if range.is_empty() {
            return;
        }

        let mut start = self.start_of(range.start_index);
        for i in range.start_index..range.end_index {
            let size = self.sizes[i];
            f(VirtualItem {
                index: i,
                start,
                size,
            });
            start = start.saturating_add(size as u64);
        }
    }

    /// Collects virtual items into `out` (clears `out` first).
    pub fn collect_virtual_items(&self, out: &mut Vec<VirtualItem>) {
        out.clear();
        self.for_each_virtual_item(|it| out.push(it));
    }

    /// Computes the full window for the current scroll state.
    pub fn window(&self) -> VirtualWindow {
        self.window_for(self.scroll_offset, self.viewport_size)
    }

    pub fn window_for(&self, scroll_offset: u64, viewport_size: u32) -> VirtualWindow {
        let visible = self.visible_range_for(scroll_offset, viewport_size);
        let range = self.overscanned(visible);
        let mut items = Vec::with_capacity(range.len());
        self.for_each_virtual_item_for(scroll_offset, viewport_size, |it| items.push(it));
        VirtualWindow {
            visible,
            range,
            items,
        }
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_size()
            .saturating_sub(self.viewport_size as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// Computes the scroll offset that brings `index` into view with the requested alignment.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        let count = self.options.count;
        if count == 0 {
            return 0;
        }
        let index = index.min(count - 1);
        let start = self.start_of(index);
        let end = start.saturating_add(self.sizes[index] as u64);
        let view = self.viewport_size as u64;

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => {
                let center = start.saturating_add((end - start) / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.scroll_offset;
                let cur_end = cur.saturating_add(view);
                if start >= cur && end <= cur_end {
                    cur
                } else if start < cur {
                    start
                } else {
                    end.saturating_sub(view)
                }
            }
        };
        self.clamp_scroll_offset(target)
    }

    /// Applies [`Self::scroll_to_index_offset`] and returns the new offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.scroll_to_index_offset(index, align);
        self.set_scroll_offset(offset);
        offset
    }

    fn overscanned(&self, visible: VisibleRange) -> VisibleRange {
        if visible.is_empty() {
            return visible;
        }
        let overscan = self.options.overscan;
        VisibleRange {
            start_index: visible.start_index.saturating_sub(overscan),
            end_index: cmp::min(
                self.options.count,
                visible.end_index.saturating_add(overscan),
            ),
        }
    }

    fn size_from_source(&self, index: usize) -> u32 {
        match self.overrides.get(&index) {
            Some(&size) => size,
            None => (self.options.estimate_size)(index),
        }
    }

    fn set_size(&mut self, index: usize, size: u32) -> i64 {
        let cur = self.sizes[index];
        if cur == size {
            return 0;
        }
        self.sizes[index] = size;
        let delta = size as i64 - cur as i64;
        self.sums.add(index, delta);
        vtrace!(index, size, delta, "Windowing::set_size");
        delta
    }

    fn rebuild_sizes(&mut self) {
        let count = self.options.count;
        vdebug!(count, overrides = self.overrides.len(), "rebuild_sizes");
        self.overrides.retain(|&i, _| i < count);
        self.sizes.clear();
        self.sizes.reserve_exact(count);
        for i in 0..count {
            let size = self.size_from_source(i);
            self.sizes.push(size);
        }
        self.rebuild_sums();
    }

    fn rebuild_sums(&mut self) {
        self.sums = Fenwick::from_values(self.sizes.iter().map(|&s| s as u64));
    }

    fn start_of(&self, index: usize) -> u64 {
        self.options.padding_start as u64 + self.sums.prefix_sum(index)
    }

    fn index_at_list_offset(&self, offset: u64) -> usize {
        let padding = self.options.padding_start as u64;
        if offset < padding {
            return 0;
        }
        // Number of items ending at or before `offset` == index of the item covering it.
        let consumed = self.sums.lower_bound(offset - padding);
        consumed.min(self.options.count.saturating_sub(1))
    }
}

/// One-shot windowing pass over `count` items.
///
/// Builds the prefix sums (`O(n)`) and returns the overscanned window for the given scroll
/// state. Prefer a long-lived [`Windowing`] when the same list is queried on every scroll event.
pub fn compute_window(
    count: usize,
    estimate_size: impl Fn(usize) -> u32 + Send + Sync + 'static,
    scroll_offset: u64,
    viewport_extent: u32,
    overscan: usize,
    overrides: &SizeOverrides,
) -> VirtualWindow {
    let mut w = Windowing::new(WindowOptions::new(count, estimate_size).with_overscan(overscan));
    for (&index, &size) in overrides.iter() {
        w.resize_item(index, size);
    }
    w.window_for(scroll_offset, viewport_extent)
}
