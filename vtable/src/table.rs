use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use vtable_window::{Align, VisibleRange, WindowOptions, Windowing};

use crate::{
    ActiveRow, AdvancedCriterion, BottomDetector, ColumnLayout, ColumnVisibility, Error,
    FilterOperator, FilterState, FlatItem, FlatKind, Flattened, Freeze, HeaderNode, KeySet,
    MeasurementProvider, Pipeline, Position, Record, ResizeOutcome, ResizeSession, Result, RowKey,
    SelectionState, SortDirection, SortState, Stage, TableCallbacks, TableOptions, Viewport,
};

pub type RowKeyFn<T> = Arc<dyn Fn(&T, usize) -> RowKey + Send + Sync>;

/// How a row's key is derived.
pub enum KeySource<T> {
    /// Reads the named field; a `Null` field falls back to the row's source index.
    Field(String),
    /// Called with the row and its index in the source data.
    Func(RowKeyFn<T>),
}

impl<T: Record> KeySource<T> {
    pub fn field(column: impl Into<String>) -> Self {
        Self::Field(column.into())
    }

    pub fn func(f: impl Fn(&T, usize) -> RowKey + Send + Sync + 'static) -> Self {
        Self::Func(Arc::new(f))
    }

    pub fn key_of(&self, item: &T, index: usize) -> RowKey {
        match self {
            Self::Field(column) => item
                .field(column)
                .to_row_key()
                .unwrap_or(RowKey::Num(index as i64)),
            Self::Func(f) => f(item, index),
        }
    }
}

impl<T> Clone for KeySource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Field(c) => Self::Field(c.clone()),
            Self::Func(f) => Self::Func(Arc::clone(f)),
        }
    }
}

impl<T> core::fmt::Debug for KeySource<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Field(c) => f.debug_tuple("Field").field(c).finish(),
            Self::Func(_) => f.debug_tuple("Func").finish_non_exhaustive(),
        }
    }
}

/// A visible body entry: a data row or its expanded detail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowSlot {
    pub flat_index: usize,
    pub kind: FlatKind,
    pub key: RowKey,
    /// Index into the source data.
    pub row: usize,
    /// Offset from the top of the body.
    pub start: u64,
    pub size: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowWindow {
    /// Overscanned range of data-row ordinals.
    pub range: VisibleRange,
    pub items: Vec<RowSlot>,
    pub total_height: u64,
}

/// A scrollable top-level column inside the column window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSlot {
    pub top: usize,
    pub key: String,
    /// Offset from the left edge of the table, frozen-left columns included.
    pub start: u64,
    pub size: u32,
}

/// A frozen column; always rendered, pinned at `offset` from its edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrozenColumn {
    pub top: usize,
    pub key: String,
    pub freeze: Freeze,
    pub offset: u32,
    pub width: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnWindow {
    /// Overscanned range of scrollable-column indexes.
    pub range: VisibleRange,
    pub items: Vec<ColumnSlot>,
    pub frozen_left: Vec<FrozenColumn>,
    pub frozen_right: Vec<FrozenColumn>,
    pub total_width: u64,
}

#[derive(Clone, Copy, Debug, Default)]
struct Dirty {
    flatten: bool,
    rows_window: bool,
    columns: bool,
}

/// The table-state store: data, filter criteria, expansion, selection, column geometry and the
/// two windowing calculators.
///
/// Every mutation brings derived state up to date before returning, in dependency order
/// (pipeline, flatten, windows), so a query never sees rows that lag behind the committed
/// criteria. Use [`Table::batch_update`] to coalesce several mutations into one pass.
pub struct Table<T> {
    options: TableOptions,
    callbacks: TableCallbacks<T>,
    key_source: KeySource<T>,
    data: Vec<T>,

    filters: FilterState,
    pipeline: Pipeline,
    flat: Flattened,
    expanded: KeySet,
    selection: SelectionState,
    active: ActiveRow,

    columns: ColumnLayout,
    resizing: Option<ResizeSession>,
    /// Scrollable columns the column window was last built from.
    window_columns: Vec<usize>,

    rows_window: Windowing,
    cols_window: Windowing,
    viewport: Viewport,
    bottom: BottomDetector,

    dirty: Dirty,
    batch_depth: usize,
}

impl<T: Record> Table<T> {
    pub fn new(
        data: Vec<T>,
        headers: Vec<HeaderNode>,
        key_source: KeySource<T>,
        options: TableOptions,
    ) -> Result<Self> {
        let columns = ColumnLayout::new(
            headers,
            options.default_column_width,
            options.default_min_width,
        )?;
        let rows_window = Windowing::new(
            WindowOptions::new(0, |_| 0).with_overscan(options.row_overscan),
        );
        let cols_window = Windowing::new(
            WindowOptions::horizontal(0, |_| 0).with_overscan(options.column_overscan),
        );
        let bottom = BottomDetector::new(options.bottom_threshold, options.bottom_throttle_ms);
        let mut table = Self {
            options,
            callbacks: TableCallbacks::default(),
            key_source,
            data,
            filters: FilterState::default(),
            pipeline: Pipeline::new(),
            flat: Flattened::new(),
            expanded: KeySet::default(),
            selection: SelectionState::new(),
            active: ActiveRow::default(),
            columns,
            resizing: None,
            window_columns: Vec::new(),
            rows_window,
            cols_window,
            viewport: Viewport::default(),
            bottom,
            dirty: Dirty {
                flatten: true,
                rows_window: true,
                columns: true,
            },
            batch_depth: 0,
        };
        table.flush();
        Ok(table)
    }

    pub fn with_callbacks(mut self, callbacks: TableCallbacks<T>) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn callbacks(&self) -> &TableCallbacks<T> {
        &self.callbacks
    }

    pub fn set_callbacks(&mut self, callbacks: TableCallbacks<T>) {
        self.callbacks = callbacks;
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Applies `f` to a copy of the options and recomputes everything that depends on them.
    pub fn update_options(&mut self, f: impl FnOnce(&mut TableOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        if next == self.options {
            return;
        }
        if next.server != self.options.server {
            self.pipeline.invalidate_all();
        }
        self.bottom = BottomDetector::new(next.bottom_threshold, next.bottom_throttle_ms);
        self.rows_window.set_overscan(next.row_overscan);
        self.cols_window.set_overscan(next.column_overscan);
        self.options = next;
        self.dirty.rows_window = true;
        self.dirty.columns = true;
        self.flush();
    }

    /// Runs `f` with recomputation deferred until it returns.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        self.batch_depth = self.batch_depth.saturating_add(1);
        f(self);
        debug_assert!(self.batch_depth > 0, "batch_depth underflow");
        self.batch_depth = self.batch_depth.saturating_sub(1);
        self.flush();
    }

    // Data

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn row(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Replaces the source rows. Expansion, selection and criteria persist.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.pipeline.invalidate_all();
        self.flush();
    }

    /// Appends rows, e.g. the next page after `on_scroll_touch_bottom`.
    pub fn append_data(&mut self, rows: impl IntoIterator<Item = T>) {
        self.data.extend(rows);
        self.pipeline.invalidate_all();
        self.flush();
    }

    /// Source indexes of the rows that passed the pipeline, in display order.
    pub fn rows(&self) -> &[usize] {
        self.pipeline.rows()
    }

    pub fn row_count(&self) -> usize {
        self.flat.row_count()
    }

    pub fn flattened(&self) -> &Flattened {
        &self.flat
    }

    /// Flat entry at `index` together with its source row.
    pub fn flat_item(&self, index: usize) -> Option<(FlatItem<'_>, &T)> {
        let item = self.flat.get(index)?;
        Some((item, &self.data[item.row]))
    }

    pub fn item_by_key(&self, key: &RowKey) -> Option<&T> {
        let ordinal = self.flat.ordinal_of(key)?;
        self.data.get(self.flat.rows()[ordinal])
    }

    // Geometry

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        self.dirty.columns = true;
        self.flush();
    }

    /// Pulls the container size from the host.
    pub fn measure(&mut self, provider: &impl MeasurementProvider) {
        self.set_viewport(provider.viewport());
    }

    /// Height of the whole header block (grouping levels plus the filter row).
    pub fn header_height(&self) -> u32 {
        self.options.header_block_height(self.columns.depth())
    }

    /// Height available to body rows.
    pub fn body_height(&self) -> u32 {
        self.viewport
            .height
            .saturating_sub(self.header_height())
            .saturating_sub(self.options.footer_block_height())
    }

    pub fn total_height(&self) -> u64 {
        self.rows_window.total_size()
    }

    pub fn total_width(&self) -> u64 {
        self.cols_window.total_size()
    }

    pub fn scroll_top(&self) -> u64 {
        self.rows_window.scroll_offset()
    }

    pub fn scroll_left(&self) -> u64 {
        self.cols_window.scroll_offset()
    }

    /// Vertical scroll event. Only the row window is touched.
    pub fn on_scroll(&mut self, scroll_top: u64, now_ms: u64) {
        self.rows_window.set_scroll_offset(scroll_top);
        if let Some(cb) = &self.callbacks.on_scroll {
            cb(scroll_top);
        }
        let total = self.rows_window.total_size();
        let viewport = self.rows_window.viewport_size();
        if self.bottom.on_scroll(scroll_top, viewport, total, now_ms) {
            if let Some(cb) = &self.callbacks.on_scroll_touch_bottom {
                cb();
            }
        }
    }

    pub fn on_scroll_horizontal(&mut self, scroll_left: u64) {
        self.cols_window.set_scroll_offset(scroll_left);
    }

    pub fn row_windowing(&self) -> &Windowing {
        &self.rows_window
    }

    pub fn column_windowing(&self) -> &Windowing {
        &self.cols_window
    }

    /// Body entries to render for the current vertical scroll position.
    pub fn row_window(&self) -> RowWindow {
        let window = self.rows_window.window();
        let row_height = self.options.row_height;
        let mut items = Vec::with_capacity(window.len() * 2);
        for it in &window {
            let ordinal = it.index;
            let flat_index = self.flat.flat_index_of_ordinal(ordinal);
            let key = &self.flat.keys()[ordinal];
            let row = self.flat.rows()[ordinal];
            let head = row_height.min(it.size);
            items.push(RowSlot {
                flat_index,
                kind: FlatKind::Row,
                key: key.clone(),
                row,
                start: it.start,
                size: head,
            });
            if self.flat.expanded_flags()[ordinal] {
                items.push(RowSlot {
                    flat_index: flat_index + 1,
                    kind: FlatKind::Expanded,
                    key: key.clone(),
                    row,
                    start: it.start + head as u64,
                    size: it.size - head,
                });
            }
        }
        RowWindow {
            range: window.range,
            items,
            total_height: self.rows_window.total_size(),
        }
    }

    /// Columns to render for the current horizontal scroll position.
    pub fn column_window(&self) -> ColumnWindow {
        let window = self.cols_window.window();
        let items = window
            .iter()
            .map(|it| {
                let top = self.window_columns[it.index];
                ColumnSlot {
                    top,
                    key: String::from(self.columns.top_key(top).unwrap_or_default()),
                    start: it.start,
                    size: it.size,
                }
            })
            .collect();
        let frozen = |tops: &[usize], offsets: &[u32], freeze: Freeze| {
            tops.iter()
                .zip(offsets)
                .map(|(&top, &offset)| FrozenColumn {
                    top,
                    key: String::from(self.columns.top_key(top).unwrap_or_default()),
                    freeze,
                    offset,
                    width: self.columns.top_width(top),
                })
                .collect::<Vec<_>>()
        };
        ColumnWindow {
            range: window.range,
            items,
            frozen_left: frozen(
                self.columns.freeze_left(),
                self.columns.left_offsets(),
                Freeze::Left,
            ),
            frozen_right: frozen(
                self.columns.freeze_right(),
                self.columns.right_offsets(),
                Freeze::Right,
            ),
            total_width: self.cols_window.total_size(),
        }
    }

    /// Scrolls the row carrying `key` into view. Returns the new scroll top.
    pub fn scroll_to_row(&mut self, key: &RowKey, align: Align) -> Option<u64> {
        let ordinal = self.flat.ordinal_of(key)?;
        Some(self.rows_window.scroll_to_index(ordinal, align))
    }

    // Filters

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort_state(&self) -> &SortState {
        &self.filters.sort
    }

    /// Header click on `column`: cycles its sort direction.
    pub fn sort_by_column(&mut self, column: &str) -> SortDirection {
        self.warn_unknown_column(column);
        let direction = self.filters.sort.cycle(column);
        self.sort_changed(column, direction);
        direction
    }

    /// Sets the sort direction of `column` directly.
    pub fn set_sort(&mut self, column: &str, direction: SortDirection) {
        self.warn_unknown_column(column);
        let before = self.filters.sort.clone();
        self.filters.sort.set(column, direction);
        if self.filters.sort != before {
            self.sort_changed(column, direction);
        }
    }

    pub fn search(&mut self, column: &str, term: &str) {
        self.warn_unknown_column(column);
        if self.filters.search.set(column, term) {
            let term = self.filters.search.get(column);
            if let Some(cb) = &self.callbacks.on_change_filter.search {
                cb(column, term);
            }
            self.stage_changed(Stage::Search);
        }
    }

    pub fn reset_search(&mut self, column: &str) {
        self.search(column, "");
    }

    pub fn filter_selection<I, S>(&mut self, column: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.warn_unknown_column(column);
        if self.filters.selection.set(column, values) {
            let values = self.filters.selection.get(column);
            if let Some(cb) = &self.callbacks.on_change_filter.selection {
                cb(column, values);
            }
            self.stage_changed(Stage::Selection);
        }
    }

    pub fn reset_filter_selection(&mut self, column: &str) {
        self.filter_selection(column, core::iter::empty::<String>());
    }

    /// Values offered by the selection filter of `column`: the declared options, or else the
    /// distinct values present in the data, sorted.
    pub fn selection_options(&self, column: &str) -> Vec<String> {
        if let Some(leaf) = self.columns.leaf(column) {
            if !leaf.filter_options.is_empty() {
                return leaf.filter_options.clone();
            }
        }
        let distinct: BTreeSet<String> = self
            .data
            .iter()
            .filter_map(|row| row.field(column).to_text().map(|s| s.into_owned()))
            .collect();
        distinct.into_iter().collect()
    }

    pub fn filter_advance(&mut self, column: &str, operator: FilterOperator, value: &str) {
        self.warn_unknown_column(column);
        if self
            .filters
            .advance
            .set(column, AdvancedCriterion::new(operator, value))
        {
            let criterion = self.filters.advance.get(column);
            if let Some(cb) = &self.callbacks.on_change_filter.advance {
                cb(column, criterion);
            }
            self.stage_changed(Stage::Advance);
        }
    }

    /// Like [`Self::filter_advance`] with the operator given by name; unknown names pass through.
    pub fn filter_advance_named(&mut self, column: &str, operator: &str, value: &str) {
        let op = FilterOperator::parse_lenient(operator);
        if op == FilterOperator::None && operator != FilterOperator::None.as_str() {
            vwarn!(column, operator, "unknown advanced filter operator; not filtering");
        }
        self.filter_advance(column, op, value);
    }

    pub fn reset_filter_advance(&mut self, column: &str) {
        self.filter_advance(column, FilterOperator::None, "");
    }

    /// Clears every criterion of every stage, notifying each removal.
    pub fn reset_filters(&mut self) {
        if self.filters.is_empty() {
            return;
        }
        let old = core::mem::take(&mut self.filters);
        let cbs = &self.callbacks.on_change_filter;
        if let (Some(column), Some(cb)) = (old.sort.column(), &cbs.sort) {
            cb(column, SortDirection::Unset);
        }
        if let Some(cb) = &cbs.search {
            old.search.iter().for_each(|(column, _)| cb(column, None));
        }
        if let Some(cb) = &cbs.selection {
            old.selection.iter().for_each(|(column, _)| cb(column, None));
        }
        if let Some(cb) = &cbs.advance {
            old.advance.iter().for_each(|(column, _)| cb(column, None));
        }
        self.pipeline.invalidate_all();
        self.flush();
    }

    // Expansion

    pub fn expanded_keys(&self) -> &KeySet {
        &self.expanded
    }

    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.expanded.contains(key)
    }

    /// Expands or collapses the row carrying `key`.
    ///
    /// Returns the new state, or `None` (no-op) when no filtered row carries the key.
    pub fn toggle_expand(&mut self, key: &RowKey) -> Option<bool> {
        self.sync_rows();
        let ordinal = self.flat.ordinal_of(key)?;
        let expanded = self.flat.toggle(key)?;
        self.set_expanded_key(key, expanded);
        if !self.dirty.rows_window {
            let size = self.row_size(expanded);
            self.rows_window.resize_item(ordinal, size);
        }
        if let Some(cb) = &self.callbacks.on_row_expand {
            cb(&self.data[self.flat.rows()[ordinal]]);
        }
        Some(expanded)
    }

    // Checkbox selection

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selection.is_selected(key)
    }

    /// Ticks or unticks the row carrying `key`; returns whether it is now selected.
    ///
    /// A key no filtered row carries is ignored and reported as unselected.
    pub fn toggle_row_selection(&mut self, key: &RowKey) -> bool {
        self.sync_rows();
        if self.flat.ordinal_of(key).is_none() {
            vtrace!(%key, "selection toggle for absent row ignored");
            return false;
        }
        let selected = self.selection.toggle(key);
        self.selection_changed();
        selected
    }

    /// Selects (`true`) or clears (`false`) every row.
    pub fn select_all(&mut self, select: bool) {
        self.selection.select_all(select);
        self.selection_changed();
    }

    // Active row

    pub fn active_row(&self) -> Option<&RowKey> {
        self.active.get()
    }

    /// Single click. Re-clicking the active row does nothing.
    pub fn click_row(&mut self, key: &RowKey) -> bool {
        self.sync_rows();
        let Some(row) = self.source_index(key) else {
            return false;
        };
        if !self.active.set(key.clone()) {
            return false;
        }
        vtrace!(%key, "row clicked");
        if let Some(cb) = &self.callbacks.on_click_row {
            cb(&self.data[row]);
        }
        true
    }

    /// Double click. Ignored when a single-click handler is registered.
    pub fn double_click_row(&mut self, key: &RowKey) -> bool {
        if self.callbacks.on_click_row.is_some() {
            return false;
        }
        self.sync_rows();
        let Some(row) = self.source_index(key) else {
            return false;
        };
        self.active.set(key.clone());
        if let Some(cb) = &self.callbacks.on_double_click_row {
            cb(&self.data[row]);
        }
        true
    }

    /// Context click; always activates the row and reports the pointer position.
    pub fn right_click_row(&mut self, key: &RowKey, position: Position) -> bool {
        self.sync_rows();
        let Some(row) = self.source_index(key) else {
            return false;
        };
        self.active.set(key.clone());
        if let Some(cb) = &self.callbacks.on_right_click_row {
            cb(&self.data[row], position);
        }
        true
    }

    // Columns

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn toggle_column_visibility(&mut self, key: &str) -> Option<bool> {
        let visible = self.columns.toggle_visibility(key)?;
        self.dirty.columns = true;
        self.flush();
        Some(visible)
    }

    pub fn column_visibility_list(&self) -> Vec<ColumnVisibility> {
        self.columns.visibility_list()
    }

    pub fn show_filter_row(&self) -> bool {
        self.options.show_filter_row
    }

    pub fn toggle_filter_row(&mut self) -> bool {
        self.options.show_filter_row = !self.options.show_filter_row;
        self.flush();
        self.options.show_filter_row
    }

    /// Starts dragging the edge of leaf column `key`.
    pub fn begin_resize(&mut self, key: &str) -> bool {
        self.resizing = self.columns.begin_resize(key);
        if self.resizing.is_none() {
            vwarn!(key, "resize of unknown column");
        }
        self.resizing.is_some()
    }

    /// Feeds the total pointer displacement; returns the preview width.
    pub fn update_resize(&mut self, delta_x: i64) -> Option<u32> {
        self.resizing.as_mut().map(|s| s.update(delta_x))
    }

    pub fn resizing(&self) -> Option<&ResizeSession> {
        self.resizing.as_ref()
    }

    pub fn cancel_resize(&mut self) {
        self.resizing = None;
    }

    /// Commits the drag: the leaf keeps its width and stops stretching.
    pub fn end_resize(&mut self) -> Option<ResizeOutcome> {
        let session = self.resizing.take()?;
        let outcome = self.columns.end_resize(session)?;
        self.dirty.columns = true;
        self.flush();
        Some(outcome)
    }

    /// Sets a leaf's width directly, as a completed drag would.
    pub fn resize_column(&mut self, key: &str, width: u32) -> Result<ResizeOutcome> {
        let outcome = self
            .columns
            .commit_resize(key, width)
            .ok_or_else(|| Error::UnknownColumn(String::from(key)))?;
        self.dirty.columns = true;
        self.flush();
        Ok(outcome)
    }

    /// Clears selection, expansion, the active row and column resizes.
    pub fn reset_state(&mut self) {
        self.selection.clear();
        self.active.clear();
        self.resizing = None;
        self.bottom.reset();
        if !self.expanded.is_empty() {
            self.expanded.clear();
            self.flat.collapse_all();
            self.dirty.rows_window = true;
        }
        self.columns.reset_sizes(self.options.default_column_width);
        self.dirty.columns = true;
        self.flush();
    }

    // Internals

    fn flush(&mut self) {
        if self.batch_depth > 0 {
            return;
        }
        self.sync_rows();
        if self.dirty.columns {
            self.columns.set_viewport(self.viewport);
            self.sync_columns_window();
            self.dirty.columns = false;
        }
        if self.dirty.rows_window {
            self.rebuild_rows_window();
            self.dirty.rows_window = false;
        }
        // Header depth, filter row and footer all shrink the body.
        let body = self.body_height();
        if self.rows_window.viewport_size() != body {
            self.rows_window.set_viewport_size(body);
            let offset = self.rows_window.scroll_offset();
            self.rows_window.set_scroll_offset_clamped(offset);
        }
    }

    /// Brings the pipeline output and the flattened rows up to date, even inside a batch, so key
    /// lookups see the committed criteria. Windows are left for [`Self::flush`].
    fn sync_rows(&mut self) {
        if self
            .pipeline
            .run(&self.data, &self.filters, self.options.server)
        {
            self.dirty.flatten = true;
        }
        if self.dirty.flatten {
            let rows = self.pipeline.rows().to_vec();
            let keys = rows
                .iter()
                .map(|&r| self.key_source.key_of(&self.data[r], r))
                .collect();
            self.flat = Flattened::build(rows, keys, &self.expanded);
            self.dirty.flatten = false;
            self.dirty.rows_window = true;
        }
    }

    fn rebuild_rows_window(&mut self) {
        let flags: Arc<[bool]> = Arc::from(self.flat.expanded_flags());
        let (row, detail) = (self.options.row_height, self.options.expanded_row_height);
        let options = WindowOptions::new(self.flat.row_count(), move |i| {
            if flags.get(i).copied().unwrap_or(false) {
                row.saturating_add(detail)
            } else {
                row
            }
        })
        .with_overscan(self.options.row_overscan);
        let offset = self.rows_window.scroll_offset();
        self.rows_window = Windowing::new(options);
        self.rows_window.set_viewport_size(self.body_height());
        self.rows_window.set_scroll_offset_clamped(offset);
    }

    /// Brings the column window in line with the layout: per-index resizes when the set of
    /// scrollable columns is unchanged, a rebuild otherwise.
    fn sync_columns_window(&mut self) {
        let widths = self.columns.scrollable_widths();
        let padding = (
            self.columns.freeze_left_width(),
            self.columns.freeze_right_width(),
        );
        if self.window_columns == self.columns.scrollable() {
            let changed: Vec<(usize, u32)> = widths
                .iter()
                .enumerate()
                .filter(|&(i, &w)| self.cols_window.item_size(i) != Some(w))
                .map(|(i, &w)| (i, w))
                .collect();
            self.cols_window.resize_items(changed);
            self.cols_window.set_padding(padding.0, padding.1);
        } else {
            let widths: Arc<[u32]> = Arc::from(widths);
            let options = WindowOptions::horizontal(widths.len(), move |i| {
                widths.get(i).copied().unwrap_or(0)
            })
            .with_overscan(self.options.column_overscan)
            .with_padding(padding.0, padding.1);
            let offset = self.cols_window.scroll_offset();
            self.cols_window = Windowing::new(options);
            self.cols_window.set_scroll_offset(offset);
            self.window_columns = self.columns.scrollable().to_vec();
        }
        self.cols_window
            .set_viewport_size(self.viewport.content_width());
        let offset = self.cols_window.scroll_offset();
        self.cols_window.set_scroll_offset_clamped(offset);
    }

    fn row_size(&self, expanded: bool) -> u32 {
        if expanded {
            self.options
                .row_height
                .saturating_add(self.options.expanded_row_height)
        } else {
            self.options.row_height
        }
    }

    fn set_expanded_key(&mut self, key: &RowKey, expanded: bool) {
        if expanded {
            self.expanded.insert(key.clone());
        } else {
            self.expanded.remove(key);
        }
    }

    fn source_index(&self, key: &RowKey) -> Option<usize> {
        self.flat.ordinal_of(key).map(|o| self.flat.rows()[o])
    }

    fn sort_changed(&mut self, column: &str, direction: SortDirection) {
        if let Some(cb) = &self.callbacks.on_change_filter.sort {
            cb(column, direction);
        }
        self.stage_changed(Stage::Sort);
    }

    fn stage_changed(&mut self, stage: Stage) {
        if self.options.server.delegates(stage) {
            vtrace!(?stage, "criterion recorded for server-delegated stage");
            return;
        }
        self.pipeline.invalidate(stage);
        self.flush();
    }

    fn selection_changed(&self) {
        if let Some(cb) = &self.callbacks.on_change_checkbox_selection {
            cb(
                self.selection.selected(),
                self.selection.deselected(),
                self.selection.is_select_all(),
            );
        }
    }

    fn warn_unknown_column(&self, column: &str) {
        if !self.columns.contains(column) {
            vwarn!(column, "filter criterion for a column without a header");
        }
    }
}

impl<T> core::fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Table")
            .field("options", &self.options)
            .field("key_source", &self.key_source)
            .field("rows", &self.data.len())
            .field("filtered", &self.flat.row_count())
            .field("filters", &self.filters)
            .field("expanded", &self.expanded.len())
            .field("selection", &self.selection)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}
