/// Outer size of the table container and the width its vertical scrollbar takes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scrollbar_width: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scrollbar_width: 0,
        }
    }

    pub const fn with_scrollbar(mut self, scrollbar_width: u32) -> Self {
        self.scrollbar_width = scrollbar_width;
        self
    }

    /// `true` until the host has laid the container out.
    pub fn is_unmeasured(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width available to columns.
    pub fn content_width(&self) -> u32 {
        self.width.saturating_sub(self.scrollbar_width)
    }
}

/// Source of container dimensions, implemented by the rendering host.
pub trait MeasurementProvider {
    fn viewport(&self) -> Viewport;
}

impl MeasurementProvider for Viewport {
    fn viewport(&self) -> Viewport {
        *self
    }
}

impl<F: Fn() -> Viewport> MeasurementProvider for F {
    fn viewport(&self) -> Viewport {
        self()
    }
}
