//! Chat glue: transcript state, reply decoding and per-message views.
//!
//! The reply body arrives as raw byte chunks. They are decoded by
//! [`Utf8StreamDecoder`], appended to the trailing reply in a
//! [`Transcript`], and shown through a [`ConversationView`] whose
//! per-message [`MessageView`]s pace the reveal.

mod decoder;
mod message_view;
mod transcript;

pub use decoder::Utf8StreamDecoder;
pub use message_view::{ConversationView, MessageView, THINKING};
pub use transcript::{ChatMessage, Role, Transcript};
