use crate::options::WindowConfig;

/// Incrementally growing count of rendered rows.
///
/// Starts at `initial` and grows by `increment` whenever the scroll
/// container comes within `threshold` pixels of its bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleWindow {
    config: WindowConfig,
    visible: usize,
}

impl VisibleWindow {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            visible: config.initial,
        }
    }

    /// Number of items to render, capped at `total`
    pub fn visible(&self, total: usize) -> usize {
        self.visible.min(total)
    }

    /// Back to the initial window, e.g. after the query changed
    pub fn reset(&mut self) {
        self.visible = self.config.initial;
    }

    /// Grow the window to at least `count` items, e.g. to reach an index
    /// header further down the list
    pub fn ensure(&mut self, count: usize) {
        self.visible = self.visible.max(count);
    }

    /// Feed a scroll position; returns true when the window grew
    pub fn on_scroll(&mut self, scroll_top: f64, viewport_height: f64, content_height: f64, total: usize) -> bool {
        if self.visible >= total {
            return false;
        }
        let distance_from_bottom = content_height - (scroll_top + viewport_height);
        if distance_from_bottom > self.config.threshold {
            return false;
        }
        self.visible = (self.visible + self.config.increment).min(total);
        true
    }
}

impl Default for VisibleWindow {
    fn default() -> Self {
        Self::new(WindowConfig::default())
    }
}
