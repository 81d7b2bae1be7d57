use crate::Stage;

/// Which pipeline stages run remotely.
///
/// A delegated stage is an identity transform locally; its criterion is still recorded and
/// published through the filter callbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServerDelegation {
    pub sort: bool,
    pub search: bool,
    pub selection: bool,
    pub advance: bool,
}

impl ServerDelegation {
    pub const NONE: Self = Self {
        sort: false,
        search: false,
        selection: false,
        advance: false,
    };

    pub const ALL: Self = Self {
        sort: true,
        search: true,
        selection: true,
        advance: true,
    };

    pub fn delegates(&self, stage: Stage) -> bool {
        match stage {
            Stage::Sort => self.sort,
            Stage::Search => self.search,
            Stage::Selection => self.selection,
            Stage::Advance => self.advance,
        }
    }

    pub fn with(mut self, stage: Stage, delegated: bool) -> Self {
        match stage {
            Stage::Sort => self.sort = delegated,
            Stage::Search => self.search = delegated,
            Stage::Selection => self.selection = delegated,
            Stage::Advance => self.advance = delegated,
        }
        self
    }
}

/// Geometry and behavior knobs for a [`crate::Table`].
///
/// Heights and widths are in px. `Default` yields the stock table metrics.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableOptions {
    pub row_height: u32,
    pub expanded_row_height: u32,
    /// Height of one header row (the leaf row).
    pub header_height: u32,
    /// Height added per level of header grouping.
    pub group_header_height: u32,
    pub filter_row_height: u32,
    pub footer_height: u32,
    pub use_footer: bool,
    pub show_filter_row: bool,
    pub row_overscan: usize,
    pub column_overscan: usize,
    pub server: ServerDelegation,
    /// Distance from the bottom (px) at which `on_scroll_touch_bottom` fires.
    pub bottom_threshold: u32,
    pub bottom_throttle_ms: u64,
    pub default_column_width: u32,
    pub default_min_width: u32,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            row_height: 28,
            expanded_row_height: 250,
            header_height: 32,
            group_header_height: 32,
            filter_row_height: 28,
            footer_height: 32,
            use_footer: false,
            show_filter_row: true,
            row_overscan: 20,
            column_overscan: 10,
            server: ServerDelegation::NONE,
            bottom_threshold: 100,
            bottom_throttle_ms: 100,
            default_column_width: 160,
            default_min_width: 50,
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_expanded_row_height(mut self, height: u32) -> Self {
        self.expanded_row_height = height;
        self
    }

    pub fn with_header_height(mut self, header_height: u32) -> Self {
        self.header_height = header_height;
        self
    }

    pub fn with_group_header_height(mut self, height: u32) -> Self {
        self.group_header_height = height;
        self
    }

    pub fn with_footer(mut self, use_footer: bool) -> Self {
        self.use_footer = use_footer;
        self
    }

    pub fn with_filter_row(mut self, show: bool) -> Self {
        self.show_filter_row = show;
        self
    }

    pub fn with_overscan(mut self, rows: usize, columns: usize) -> Self {
        self.row_overscan = rows;
        self.column_overscan = columns;
        self
    }

    pub fn with_server(mut self, server: ServerDelegation) -> Self {
        self.server = server;
        self
    }

    pub fn with_bottom_detection(mut self, threshold: u32, throttle_ms: u64) -> Self {
        self.bottom_threshold = threshold;
        self.bottom_throttle_ms = throttle_ms;
        self
    }

    /// Total header block height for a header tree of `depth` grouping levels.
    pub fn header_block_height(&self, depth: usize) -> u32 {
        let groups = self.group_header_height.saturating_mul(depth as u32);
        let filter = if self.show_filter_row {
            self.filter_row_height
        } else {
            0
        };
        self.header_height.saturating_add(groups).saturating_add(filter)
    }

    pub fn footer_block_height(&self) -> u32 {
        if self.use_footer { self.footer_height } else { 0 }
    }
}
