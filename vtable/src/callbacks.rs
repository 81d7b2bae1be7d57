use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::sync::Arc;

use crate::{AdvancedCriterion, KeySet, SortDirection};

/// Pointer position of a context-menu click, in client px.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

pub type OnScrollCallback = Arc<dyn Fn(u64) + Send + Sync>;
pub type OnRowCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;
pub type OnRowAtCallback<T> = Arc<dyn Fn(&T, Position) + Send + Sync>;
/// `(selected, deselected, is_select_all)`.
pub type OnCheckboxSelectionCallback = Arc<dyn Fn(&KeySet, &KeySet, bool) + Send + Sync>;
pub type OnTouchBottomCallback = Arc<dyn Fn() + Send + Sync>;

pub type OnSortChangeCallback = Arc<dyn Fn(&str, SortDirection) + Send + Sync>;
/// `None` means the column's term was removed.
pub type OnSearchChangeCallback = Arc<dyn Fn(&str, Option<&str>) + Send + Sync>;
pub type OnSelectionChangeCallback = Arc<dyn Fn(&str, Option<&BTreeSet<String>>) + Send + Sync>;
pub type OnAdvanceChangeCallback = Arc<dyn Fn(&str, Option<&AdvancedCriterion>) + Send + Sync>;

/// Per-stage criterion notifications, fired for local and server-delegated stages alike.
#[derive(Clone, Default)]
pub struct FilterCallbacks {
    pub sort: Option<OnSortChangeCallback>,
    pub search: Option<OnSearchChangeCallback>,
    pub selection: Option<OnSelectionChangeCallback>,
    pub advance: Option<OnAdvanceChangeCallback>,
}

impl core::fmt::Debug for FilterCallbacks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FilterCallbacks")
            .field("sort", &self.sort.is_some())
            .field("search", &self.search.is_some())
            .field("selection", &self.selection.is_some())
            .field("advance", &self.advance.is_some())
            .finish()
    }
}

/// Everything a [`crate::Table`] reports back to its host.
pub struct TableCallbacks<T> {
    pub on_scroll: Option<OnScrollCallback>,
    pub on_row_expand: Option<OnRowCallback<T>>,
    pub on_click_row: Option<OnRowCallback<T>>,
    pub on_double_click_row: Option<OnRowCallback<T>>,
    pub on_right_click_row: Option<OnRowAtCallback<T>>,
    pub on_change_checkbox_selection: Option<OnCheckboxSelectionCallback>,
    pub on_change_filter: FilterCallbacks,
    pub on_scroll_touch_bottom: Option<OnTouchBottomCallback>,
}

impl<T> Default for TableCallbacks<T> {
    fn default() -> Self {
        Self {
            on_scroll: None,
            on_row_expand: None,
            on_click_row: None,
            on_double_click_row: None,
            on_right_click_row: None,
            on_change_checkbox_selection: None,
            on_change_filter: FilterCallbacks::default(),
            on_scroll_touch_bottom: None,
        }
    }
}

impl<T> Clone for TableCallbacks<T> {
    fn clone(&self) -> Self {
        Self {
            on_scroll: self.on_scroll.clone(),
            on_row_expand: self.on_row_expand.clone(),
            on_click_row: self.on_click_row.clone(),
            on_double_click_row: self.on_double_click_row.clone(),
            on_right_click_row: self.on_right_click_row.clone(),
            on_change_checkbox_selection: self.on_change_checkbox_selection.clone(),
            on_change_filter: self.on_change_filter.clone(),
            on_scroll_touch_bottom: self.on_scroll_touch_bottom.clone(),
        }
    }
}

impl<T> TableCallbacks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_scroll(mut self, f: impl Fn(u64) + Send + Sync + 'static) -> Self {
        self.on_scroll = Some(Arc::new(f));
        self
    }

    pub fn on_row_expand(mut self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_row_expand = Some(Arc::new(f));
        self
    }

    pub fn on_click_row(mut self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_click_row = Some(Arc::new(f));
        self
    }

    pub fn on_double_click_row(mut self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_double_click_row = Some(Arc::new(f));
        self
    }

    pub fn on_right_click_row(mut self, f: impl Fn(&T, Position) + Send + Sync + 'static) -> Self {
        self.on_right_click_row = Some(Arc::new(f));
        self
    }

    pub fn on_change_checkbox_selection(
        mut self,
        f: impl Fn(&KeySet, &KeySet, bool) + Send + Sync + 'static,
    ) -> Self {
        self.on_change_checkbox_selection = Some(Arc::new(f));
        self
    }

    pub fn on_sort_change(
        mut self,
        f: impl Fn(&str, SortDirection) + Send + Sync + 'static,
    ) -> Self {
        self.on_change_filter.sort = Some(Arc::new(f));
        self
    }

    pub fn on_search_change(
        mut self,
        f: impl Fn(&str, Option<&str>) + Send + Sync + 'static,
    ) -> Self {
        self.on_change_filter.search = Some(Arc::new(f));
        self
    }

    pub fn on_selection_change(
        mut self,
        f: impl Fn(&str, Option<&BTreeSet<String>>) + Send + Sync + 'static,
    ) -> Self {
        self.on_change_filter.selection = Some(Arc::new(f));
        self
    }

    pub fn on_advance_change(
        mut self,
        f: impl Fn(&str, Option<&AdvancedCriterion>) + Send + Sync + 'static,
    ) -> Self {
        self.on_change_filter.advance = Some(Arc::new(f));
        self
    }

    pub fn on_scroll_touch_bottom(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_scroll_touch_bottom = Some(Arc::new(f));
        self
    }
}

impl<T> core::fmt::Debug for TableCallbacks<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableCallbacks")
            .field("on_scroll", &self.on_scroll.is_some())
            .field("on_row_expand", &self.on_row_expand.is_some())
            .field("on_click_row", &self.on_click_row.is_some())
            .field("on_double_click_row", &self.on_double_click_row.is_some())
            .field("on_right_click_row", &self.on_right_click_row.is_some())
            .field(
                "on_change_checkbox_selection",
                &self.on_change_checkbox_selection.is_some(),
            )
            .field("on_change_filter", &self.on_change_filter)
            .field("on_scroll_touch_bottom", &self.on_scroll_touch_bottom.is_some())
            .finish()
    }
}
