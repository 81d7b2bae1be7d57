/// Fires once when the scroll position comes within `threshold` px of the bottom.
///
/// Only the transition into the bottom zone fires. The zone latch re-arms when the position
/// leaves it or the content height changes (more rows arrived). A fire closer than `throttle_ms`
/// to the previous one is dropped; the caller supplies the clock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BottomDetector {
    threshold: u32,
    throttle_ms: u64,
    last_fire_ms: Option<u64>,
    latched: bool,
    total_height: u64,
}

impl BottomDetector {
    pub fn new(threshold: u32, throttle_ms: u64) -> Self {
        Self {
            threshold,
            throttle_ms,
            last_fire_ms: None,
            latched: false,
            total_height: 0,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Re-arms the detector.
    pub fn reset(&mut self) {
        self.latched = false;
        self.last_fire_ms = None;
    }

    /// Evaluates a scroll event; returns `true` when the bottom callback should fire.
    pub fn on_scroll(
        &mut self,
        scroll_top: u64,
        viewport: u32,
        total_height: u64,
        now_ms: u64,
    ) -> bool {
        if total_height != self.total_height {
            self.total_height = total_height;
            self.latched = false;
        }
        if viewport == 0 {
            return false;
        }
        let remaining = total_height.saturating_sub(scroll_top.saturating_add(viewport as u64));
        let near = remaining <= self.threshold as u64;
        let entered = near && !self.latched;
        self.latched = near;
        if !entered {
            return false;
        }
        if let Some(last) = self.last_fire_ms {
            if now_ms.saturating_sub(last) < self.throttle_ms {
                return false;
            }
        }
        self.last_fire_ms = Some(now_ms);
        vdebug!(scroll_top, total_height, "scroll touched bottom");
        true
    }
}
