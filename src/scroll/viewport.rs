//! Viewport abstraction: the scrollable container the controller drives.

/// How a programmatic scroll should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Animate toward the target.
    #[default]
    Smooth,
    /// Jump straight to the target.
    Instant,
}

/// Scroll geometry of a viewport, in the viewport's own units
/// (pixels for a GUI, rows for a terminal).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance from the top of the content to the top of the visible area.
    pub scroll_top: f64,
    /// Total content height.
    pub scroll_height: f64,
    /// Visible height.
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Create metrics from raw values.
    pub const fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Distance between the bottom of the visible area and the end of the content.
    pub fn gap(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }

    /// Largest reachable `scroll_top`.
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// A scrollable container.
///
/// The controller only reads geometry and issues scroll commands; the
/// content belongs to whoever owns the viewport.
pub trait Viewport {
    /// Current scroll geometry.
    fn metrics(&self) -> ScrollMetrics;

    /// Scroll so that `scroll_top == top` (clamped by the implementation).
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
}

impl<V: Viewport + ?Sized> Viewport for &mut V {
    fn metrics(&self) -> ScrollMetrics {
        (**self).metrics()
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        (**self).scroll_to(top, behavior);
    }
}

impl<V: Viewport + ?Sized> Viewport for Box<V> {
    fn metrics(&self) -> ScrollMetrics {
        (**self).metrics()
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        (**self).scroll_to(top, behavior);
    }
}
