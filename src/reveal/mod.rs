//! Incremental reveal: smooth token-by-token display of streamed text.
//!
//! Network chunks arrive in bursts. Showing them as they land makes text
//! jump around, so the display is paced by a fixed tick instead, revealing
//! a few graphemes per tick and speeding up when it falls behind.
//!
//! # Architecture
//!
//! ```text
//!  chunk ──append──▶ SourceCell ◀──load── Reveal::tick ◀── RevealClock
//!                                             │
//!                                             ▼
//!                                   displayed ──▶ balance_code_fences ──▶ render
//! ```
//!
//! # Example
//!
//! ```rust
//! use driftview::reveal::{Reveal, Step};
//!
//! let mut reveal = Reveal::default();
//! reveal.update("Hello, world", true);
//! assert_eq!(reveal.tick(), Step::Advanced { from: 0, to: 2 });
//! assert_eq!(reveal.displayed(), "He");
//!
//! reveal.set_streaming(false);
//! assert_eq!(reveal.displayed(), "Hello, world");
//! ```

mod clock;
mod config;
mod controller;
mod fence;
mod source;

pub use clock::RevealClock;
pub use config::{JumpTable, JumpTier, RevealConfig};
pub use controller::{Reveal, Step};
pub use fence::{balance_code_fences, FENCE};
pub use source::SourceCell;
