//! Stick-to-bottom scroll controller.

use super::viewport::{ScrollBehavior, Viewport};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Whether the viewport is following the newest content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stickiness {
    /// Within the threshold of the bottom; content growth is followed.
    Pinned,
    /// The user scrolled away; content growth is left alone.
    Unpinned,
}

/// Configuration for a [`ScrollController`].
#[derive(Debug, Clone)]
pub struct ScrollConfig {
    /// A gap below this counts as "at the bottom".
    pub pin_threshold: f64,
    /// Behavior of automatic follow scrolls.
    pub follow_behavior: ScrollBehavior,
    /// Behavior of explicit [`ScrollController::scroll_to_bottom`] calls.
    pub jump_behavior: ScrollBehavior,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            pin_threshold: 100.0,
            follow_behavior: ScrollBehavior::Smooth,
            jump_behavior: ScrollBehavior::Smooth,
        }
    }
}

impl ScrollConfig {
    /// Set the pin threshold.
    #[must_use]
    pub const fn with_pin_threshold(mut self, threshold: f64) -> Self {
        self.pin_threshold = threshold;
        self
    }

    /// Set the follow-scroll behavior.
    #[must_use]
    pub const fn with_follow_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.follow_behavior = behavior;
        self
    }

    /// Set the explicit jump behavior.
    #[must_use]
    pub const fn with_jump_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.jump_behavior = behavior;
        self
    }
}

/// Keeps a viewport glued to its bottom edge unless the user scrolls away.
///
/// Call [`on_scroll`](Self::on_scroll) from every scroll event,
/// [`on_content_changed`](Self::on_content_changed) whenever the content may
/// have grown, and [`on_frame`](Self::on_frame) once per rendered frame,
/// after layout. Follow scrolls are deferred to `on_frame` so they read
/// post-layout geometry; at most one is ever pending.
#[derive(Debug)]
pub struct ScrollController<V> {
    /// The scrolled container.
    viewport: V,
    /// Configuration.
    config: ScrollConfig,
    /// Current state.
    stickiness: Stickiness,
    /// A follow scroll waits for the next frame.
    pending_follow: bool,
    /// Fingerprint of the last content dependency seen.
    last_dependency: Option<u64>,
}

impl<V: Viewport> ScrollController<V> {
    /// Create a controller with default configuration. Starts pinned.
    pub fn new(viewport: V) -> Self {
        Self::with_config(viewport, ScrollConfig::default())
    }

    /// Create a controller with custom configuration. Starts pinned.
    pub const fn with_config(viewport: V, config: ScrollConfig) -> Self {
        Self {
            viewport,
            config,
            stickiness: Stickiness::Pinned,
            pending_follow: false,
            last_dependency: None,
        }
    }

    /// Re-evaluate stickiness from the viewport's current geometry.
    pub fn on_scroll(&mut self) -> Stickiness {
        let metrics = self.viewport.metrics();
        let next = if metrics.gap() < self.config.pin_threshold {
            Stickiness::Pinned
        } else {
            Stickiness::Unpinned
        };

        if next != self.stickiness {
            tracing::debug!(gap = metrics.gap(), state = ?next, "scroll stickiness changed");
            if next == Stickiness::Pinned {
                // Settle onto the exact bottom once the user comes back.
                self.pending_follow = true;
            }
            self.stickiness = next;
        }

        self.stickiness
    }

    /// Note that the viewport was resized.
    ///
    /// A resize moves the bottom edge without the user scrolling, so the
    /// state is kept as is. A pinned viewport gets a follow on the next
    /// frame. Returns whether a follow is now pending.
    pub fn on_resize(&mut self) -> bool {
        if self.stickiness == Stickiness::Pinned {
            self.pending_follow = true;
        }
        self.pending_follow
    }

    /// Note that content tied to `dependency` may have changed.
    ///
    /// Schedules a follow scroll for the next frame when the dependency
    /// differs from the last one seen and the viewport is pinned. Returns
    /// whether a follow is now pending.
    pub fn on_content_changed<D: Hash + ?Sized>(&mut self, dependency: &D) -> bool {
        let mut hasher = DefaultHasher::new();
        dependency.hash(&mut hasher);
        let fingerprint = hasher.finish();

        if self.last_dependency != Some(fingerprint) {
            self.last_dependency = Some(fingerprint);
            if self.stickiness == Stickiness::Pinned {
                self.pending_follow = true;
            }
        }

        self.pending_follow
    }

    /// Run the pending follow scroll, if any. Call once per frame.
    ///
    /// Returns whether a scroll was issued. A follow scheduled while pinned
    /// is dropped if the user scrolled away before the frame.
    pub fn on_frame(&mut self) -> bool {
        if !std::mem::take(&mut self.pending_follow) || self.stickiness != Stickiness::Pinned {
            return false;
        }

        let target = self.viewport.metrics().max_scroll_top();
        self.viewport.scroll_to(target, self.config.follow_behavior);
        tracing::trace!(target, "followed content to bottom");
        true
    }

    /// Scroll to the bottom now and pin, whatever the current state.
    pub fn scroll_to_bottom(&mut self) {
        let target = self.viewport.metrics().max_scroll_top();
        self.viewport.scroll_to(target, self.config.jump_behavior);
        self.pending_follow = false;

        if self.stickiness != Stickiness::Pinned {
            tracing::debug!("scroll pinned by explicit jump");
        }
        self.stickiness = Stickiness::Pinned;
    }

    /// Current state.
    pub const fn stickiness(&self) -> Stickiness {
        self.stickiness
    }

    /// Whether the viewport follows new content.
    pub fn is_pinned(&self) -> bool {
        self.stickiness == Stickiness::Pinned
    }

    /// Whether a "jump to latest" affordance should be shown.
    pub fn show_scroll_button(&self) -> bool {
        !self.is_pinned()
    }

    /// Whether a follow scroll waits for the next frame.
    pub const fn has_pending_follow(&self) -> bool {
        self.pending_follow
    }

    /// The controlled viewport.
    pub const fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Mutable access to the viewport, e.g. to apply user scrolling.
    ///
    /// Call [`on_scroll`](Self::on_scroll) afterwards.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    /// Configuration.
    pub const fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Release the viewport.
    pub fn into_inner(self) -> V {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::{ScrollMetrics, TranscriptViewport};

    /// Viewport that records every scroll command.
    #[derive(Debug, Default)]
    struct FakeViewport {
        metrics: ScrollMetrics,
        scrolls: Vec<(f64, ScrollBehavior)>,
    }

    impl FakeViewport {
        fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
            Self {
                metrics: ScrollMetrics::new(scroll_top, scroll_height, client_height),
                scrolls: Vec::new(),
            }
        }
    }

    impl Viewport for FakeViewport {
        fn metrics(&self) -> ScrollMetrics {
            self.metrics
        }

        fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
            self.metrics.scroll_top = top.clamp(0.0, self.metrics.max_scroll_top());
            self.scrolls.push((top, behavior));
        }
    }

    fn controller(scroll_top: f64) -> ScrollController<FakeViewport> {
        ScrollController::new(FakeViewport::new(scroll_top, 1000.0, 400.0))
    }

    #[test]
    fn test_threshold() {
        let mut near = controller(550.0);
        assert_eq!(near.on_scroll(), Stickiness::Pinned);
        assert!(!near.show_scroll_button());

        let mut far = controller(450.0);
        assert_eq!(far.on_scroll(), Stickiness::Unpinned);
        assert!(far.show_scroll_button());
    }

    #[test]
    fn test_gap_equal_to_threshold_unpins() {
        let mut ctl = controller(500.0);
        assert_eq!(ctl.on_scroll(), Stickiness::Unpinned);
    }

    #[test]
    fn test_follow_is_deferred_to_frame() {
        let mut ctl = controller(600.0);
        ctl.on_scroll();

        ctl.viewport_mut().metrics.scroll_height = 1200.0;
        assert!(ctl.on_content_changed(&1u64));
        assert!(ctl.viewport().scrolls.is_empty());

        assert!(ctl.on_frame());
        assert_eq!(ctl.viewport().scrolls, vec![(800.0, ScrollBehavior::Smooth)]);
        assert!(!ctl.on_frame());
    }

    #[test]
    fn test_unchanged_dependency_does_not_schedule() {
        let mut ctl = controller(600.0);
        assert!(ctl.on_content_changed("rev-1"));
        assert!(ctl.on_frame());
        assert!(!ctl.on_content_changed("rev-1"));
        assert!(!ctl.on_frame());
    }

    #[test]
    fn test_unpin_repin_roundtrip() {
        let mut ctl = controller(600.0);
        assert!(ctl.is_pinned());

        ctl.viewport_mut().metrics.scroll_top = 100.0;
        assert_eq!(ctl.on_scroll(), Stickiness::Unpinned);

        ctl.viewport_mut().metrics.scroll_height = 1500.0;
        assert!(!ctl.on_content_changed(&2u64));
        assert!(!ctl.on_frame());
        assert!(ctl.viewport().scrolls.is_empty());

        ctl.scroll_to_bottom();
        assert!(ctl.is_pinned());
        assert_eq!(ctl.viewport().scrolls, vec![(1100.0, ScrollBehavior::Smooth)]);
    }

    #[test]
    fn test_scroll_to_bottom_twice() {
        let mut ctl = controller(0.0);
        ctl.on_scroll();
        ctl.scroll_to_bottom();
        ctl.scroll_to_bottom();
        assert!(ctl.is_pinned());
        assert_eq!(ctl.viewport().scrolls.len(), 2);
        assert!((ctl.viewport().metrics.scroll_top - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_returning_near_bottom_repins_and_settles() {
        let mut ctl = controller(100.0);
        assert_eq!(ctl.on_scroll(), Stickiness::Unpinned);

        ctl.viewport_mut().metrics.scroll_top = 560.0;
        assert_eq!(ctl.on_scroll(), Stickiness::Pinned);
        assert!(ctl.has_pending_follow());
        assert!(ctl.on_frame());
        assert!((ctl.viewport().metrics.scroll_top - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scroll_away_before_frame_drops_follow() {
        let mut ctl = controller(600.0);
        assert!(ctl.on_content_changed(&3u64));

        ctl.viewport_mut().metrics.scroll_top = 0.0;
        ctl.on_scroll();
        assert!(!ctl.on_frame());
        assert!(ctl.viewport().scrolls.is_empty());
    }

    #[test]
    fn test_resize_keeps_pinned_and_follows() {
        let mut ctl = controller(600.0);
        ctl.viewport_mut().metrics = ScrollMetrics::new(600.0, 2000.0, 200.0);
        assert!(ctl.on_resize());
        assert!(ctl.is_pinned());
        assert!(ctl.on_frame());
        assert_eq!(ctl.viewport().scrolls, vec![(1800.0, ScrollBehavior::Smooth)]);
    }

    #[test]
    fn test_resize_leaves_unpinned_alone() {
        let mut ctl = controller(0.0);
        ctl.on_scroll();
        ctl.viewport_mut().metrics = ScrollMetrics::new(0.0, 2000.0, 200.0);
        assert!(!ctl.on_resize());
        assert!(!ctl.on_frame());
        assert!(ctl.show_scroll_button());
    }

    #[test]
    fn test_narrowing_rewrapped_transcript_stays_pinned() {
        let config = ScrollConfig::default()
            .with_pin_threshold(2.0)
            .with_follow_behavior(ScrollBehavior::Instant);
        let mut ctl = ScrollController::with_config(TranscriptViewport::new(40, 10), config);
        let text = vec!["x".repeat(30); 30].join("\n");
        ctl.viewport_mut().set_content(&text);
        ctl.scroll_to_bottom();
        while ctl.viewport_mut().animate() {}
        assert!((ctl.viewport().scroll_top() - 20.0).abs() < f64::EPSILON);

        // Each line now takes two rows: 60 rows, bottom at 50.
        ctl.viewport_mut().set_size(20, 10);
        assert!(ctl.on_resize());
        assert!(ctl.is_pinned());
        assert!(ctl.on_frame());
        assert!((ctl.viewport().scroll_top() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_config() {
        let config = ScrollConfig::default()
            .with_pin_threshold(2.0)
            .with_follow_behavior(ScrollBehavior::Instant)
            .with_jump_behavior(ScrollBehavior::Instant);
        let mut ctl = ScrollController::with_config(FakeViewport::new(5.0, 20.0, 10.0), config);
        assert_eq!(ctl.on_scroll(), Stickiness::Unpinned);
        ctl.scroll_to_bottom();
        assert_eq!(ctl.viewport().scrolls, vec![(10.0, ScrollBehavior::Instant)]);
    }

    #[test]
    fn test_works_through_mutable_reference() {
        let mut viewport = FakeViewport::new(600.0, 1000.0, 400.0);
        {
            let mut ctl = ScrollController::new(&mut viewport);
            ctl.scroll_to_bottom();
        }
        assert_eq!(viewport.scrolls.len(), 1);
    }
}
