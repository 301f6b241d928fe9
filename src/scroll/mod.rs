//! Stick-to-bottom scrolling for views whose content grows while you read.
//!
//! A viewport is *pinned* while its bottom edge is within a small threshold
//! of the end of the content. Pinned viewports follow new content; once the
//! reader scrolls up they are left alone until they scroll back down or an
//! explicit [`ScrollController::scroll_to_bottom`] re-pins them.
//!
//! ```text
//!            gap >= threshold
//!   Pinned ───────────────────▶ Unpinned
//!     ▲  ◀───────────────────     │
//!     │     gap < threshold       │
//!     └──── scroll_to_bottom ─────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use driftview::scroll::{ScrollConfig, ScrollController, TranscriptViewport};
//!
//! let viewport = TranscriptViewport::new(40, 10);
//! let config = ScrollConfig::default().with_pin_threshold(2.0);
//! let mut scroll = ScrollController::with_config(viewport, config);
//!
//! scroll.viewport_mut().set_content(&"line\n".repeat(50));
//! scroll.on_content_changed(&1u64);
//! scroll.on_frame();
//! assert!(scroll.is_pinned());
//! ```

mod controller;
mod transcript;
mod viewport;

pub use controller::{ScrollConfig, ScrollController, Stickiness};
pub use transcript::{wrap, Row, TranscriptViewport};
pub use viewport::{ScrollBehavior, ScrollMetrics, Viewport};
