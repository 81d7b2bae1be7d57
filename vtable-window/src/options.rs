use alloc::sync::Arc;

use crate::Axis;

/// Per-index size estimator (index → px along the axis).
pub type EstimateSize = Arc<dyn Fn(usize) -> u32 + Send + Sync>;

/// Configuration for [`crate::Windowing`].
///
/// Cheap to clone: the estimator lives in an `Arc`, so callers can tweak a field and hand the
/// options back via `Windowing::set_options` without reallocating the closure.
pub struct WindowOptions {
    pub count: usize,
    pub estimate_size: EstimateSize,
    pub axis: Axis,
    pub overscan: usize,
    /// Space before the first item (e.g. a sticky header inside the scroll container).
    pub padding_start: u32,
    /// Space after the last item (e.g. a sticky footer).
    pub padding_end: u32,
}

impl Clone for WindowOptions {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            estimate_size: Arc::clone(&self.estimate_size),
            axis: self.axis,
            overscan: self.overscan,
            padding_start: self.padding_start,
            padding_end: self.padding_end,
        }
    }
}

impl WindowOptions {
    /// Creates vertical options with an overscan of 1.
    pub fn new(count: usize, estimate_size: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            count,
            estimate_size: Arc::new(estimate_size),
            axis: Axis::Vertical,
            overscan: 1,
            padding_start: 0,
            padding_end: 0,
        }
    }

    /// Shorthand for horizontal (column) options.
    pub fn horizontal(
        count: usize,
        estimate_size: impl Fn(usize) -> u32 + Send + Sync + 'static,
    ) -> Self {
        Self::new(count, estimate_size).with_axis(Axis::Horizontal)
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_padding(mut self, padding_start: u32, padding_end: u32) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }

    pub fn with_estimate_size(
        mut self,
        estimate_size: impl Fn(usize) -> u32 + Send + Sync + 'static,
    ) -> Self {
        self.estimate_size = Arc::new(estimate_size);
        self
    }
}

impl core::fmt::Debug for WindowOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowOptions")
            .field("count", &self.count)
            .field("axis", &self.axis)
            .field("overscan", &self.overscan)
            .field("padding_start", &self.padding_start)
            .field("padding_end", &self.padding_end)
            .finish_non_exhaustive()
    }
}
