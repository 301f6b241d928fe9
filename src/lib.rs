//! # Driftview
//!
//! Streaming-chat display controllers for terminal front-ends.
//!
//! Driftview paces bursty LLM replies into a steady, readable reveal and
//! keeps the view glued to the newest text until the reader scrolls away.
//!
//! ## Core Concepts
//!
//! - **Incremental reveal**: a fixed tick advances a grapheme cursor over the
//!   latest source, with larger jumps the further the display lags behind
//! - **Stick-to-bottom scrolling**: the view follows new content only while
//!   its bottom edge is within a threshold of the end
//! - **Actor model**: isolated threads for input polling and the reveal tick
//! - **Fence balancing**: partially revealed code blocks render as closed
//!
//! ## Example
//!
//! ```rust
//! use driftview::{Reveal, ScrollConfig, ScrollController, TranscriptViewport};
//!
//! let mut reveal = Reveal::default();
//! let mut scroll = ScrollController::with_config(
//!     TranscriptViewport::new(40, 5),
//!     ScrollConfig::default().with_pin_threshold(2.0),
//! );
//!
//! reveal.update("Streaming **text** arrives in bursts.", true);
//! reveal.tick();
//!
//! scroll.viewport_mut().set_content(reveal.displayed());
//! scroll.on_content_changed(reveal.displayed());
//! scroll.on_frame();
//! assert!(scroll.is_pinned());
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod chat;
pub mod error;
pub mod reveal;
pub mod scroll;
pub mod telemetry;
pub mod terminal;

// Re-exports for convenience
pub use actor::{InputActor, InputConfig, InputEvent, StreamEvent, TickerActor, ViewIntent};
pub use chat::{ChatMessage, ConversationView, MessageView, Role, Transcript, Utf8StreamDecoder};
pub use error::{Error, Result};
pub use reveal::{balance_code_fences, Reveal, RevealClock, RevealConfig, SourceCell, Step};
pub use scroll::{ScrollBehavior, ScrollConfig, ScrollController, Stickiness, TranscriptViewport, Viewport};
pub use terminal::{SessionConfig, TerminalSession};
