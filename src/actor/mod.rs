//! Actor Model: Message-passing concurrency for the chat view.
//!
//! Each actor owns one thread and talks to the main loop over crossbeam
//! channels:
//! - **Input Actor**: Polls terminal events, forwards them to the main loop
//! - **Ticker Actor**: Emits the periodic tick that paces the reveal
//! - **Main Loop**: Owns the transcript and both controllers
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │  Main Loop   │
//!                                      │              │
//! ┌──────────────┐        Tick         │   Reveal     │
//! │Ticker Thread │ ─────────────────▶  │   Scroll     │
//! └──────────────┘                     └──────────────┘
//!                                            ▲
//!                                            │ StreamEvent
//!                                      ┌──────────────┐
//!                                      │ Reply reader │
//!                                      └──────────────┘
//! ```

mod input;
mod messages;
mod ticker;

pub use input::{convert_event, InputActor, InputConfig};
pub use messages::{InputEvent, KeyCode, KeyModifiers, StreamEvent, ViewIntent};
pub use ticker::{Tick, TickerActor};
