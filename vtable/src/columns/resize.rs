use alloc::string::String;

/// An in-progress column edge drag.
///
/// The width shown while dragging is `max(min_width, start_width + Δx)`; nothing is committed
/// until the session is handed back to [`super::ColumnLayout::end_resize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResizeSession {
    key: String,
    start_width: u32,
    min_width: u32,
    delta: i64,
}

impl ResizeSession {
    pub(crate) fn new(key: &str, start_width: u32, min_width: u32) -> Self {
        Self {
            key: String::from(key),
            start_width,
            min_width,
            delta: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn start_width(&self) -> u32 {
        self.start_width
    }

    /// Sets the total pointer displacement since the drag began.
    pub fn update(&mut self, delta_x: i64) -> u32 {
        self.delta = delta_x;
        self.width()
    }

    /// Adds a relative pointer movement (pointer-lock style events).
    pub fn step(&mut self, movement_x: i64) -> u32 {
        self.delta = self.delta.saturating_add(movement_x);
        self.width()
    }

    pub fn width(&self) -> u32 {
        let raw = (self.start_width as i64).saturating_add(self.delta);
        raw.clamp(self.min_width as i64, u32::MAX as i64) as u32
    }
}
