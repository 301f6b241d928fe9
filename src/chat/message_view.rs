//! Per-message display state: one reveal controller per message.

use super::transcript::{ChatMessage, Role, Transcript};
use crate::reveal::{balance_code_fences, Reveal, RevealConfig, Step};
use std::borrow::Cow;

/// Placeholder shown while a reply has produced no visible text yet.
pub const THINKING: &str = "Thinking...";

/// Display binding for a single message.
///
/// Only assistant messages that are still streaming are revealed
/// gradually; everything else is shown in full.
#[derive(Debug)]
pub struct MessageView {
    role: Role,
    reveal: Reveal,
}

impl MessageView {
    /// Create a view for `message`.
    pub fn new(message: &ChatMessage, config: RevealConfig) -> Self {
        let mut view = Self {
            role: message.role,
            reveal: Reveal::new(config),
        };
        view.sync(message);
        view
    }

    /// Feed the message's latest content and streaming flag.
    pub fn sync(&mut self, message: &ChatMessage) -> &str {
        self.role = message.role;
        let smooth = message.role == Role::Assistant && message.streaming;
        self.reveal.update(&message.content, smooth)
    }

    /// Advance the reveal by one tick.
    pub fn tick(&mut self) -> Step {
        self.reveal.tick()
    }

    /// Text ready for markdown rendering, with dangling fences closed.
    pub fn render_text(&self) -> Cow<'_, str> {
        balance_code_fences(self.reveal.displayed())
    }

    /// Whether this message is being revealed gradually.
    pub const fn is_streaming(&self) -> bool {
        self.reveal.is_streaming()
    }

    /// Author of the message.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The underlying reveal controller.
    pub const fn reveal(&self) -> &Reveal {
        &self.reveal
    }
}

/// Views for every message of a [`Transcript`].
#[derive(Debug, Default)]
pub struct ConversationView {
    config: RevealConfig,
    views: Vec<MessageView>,
}

impl ConversationView {
    /// Create an empty conversation view.
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            views: Vec::new(),
        }
    }

    /// Bring the views in line with the transcript.
    ///
    /// New messages get fresh views; removed messages drop theirs, which
    /// also discards their reveal state.
    pub fn sync(&mut self, transcript: &Transcript) {
        let messages = transcript.messages();
        self.views.truncate(messages.len());
        for (view, message) in self.views.iter_mut().zip(messages) {
            view.sync(message);
        }
        for message in &messages[self.views.len()..] {
            self.views.push(MessageView::new(message, self.config.clone()));
        }
    }

    /// Tick every streaming view. Returns whether any display text changed.
    pub fn tick(&mut self) -> bool {
        self.views
            .iter_mut()
            .filter(|view| view.is_streaming())
            .fold(false, |changed, view| {
                matches!(view.tick(), Step::Advanced { .. }) || changed
            })
    }

    /// Whether any message is being revealed (and so needs the tick clock).
    pub fn is_streaming(&self) -> bool {
        self.views.iter().any(MessageView::is_streaming)
    }

    /// Render the whole conversation as plain text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, view) in self.views.iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n");
            }
            out.push_str(match view.role() {
                Role::User => "› ",
                Role::Assistant => "● ",
            });
            out.push_str(view.role().label());
            out.push('\n');

            let text = view.render_text();
            if text.is_empty() && view.is_streaming() {
                out.push_str(THINKING);
            } else {
                out.push_str(&text);
            }
        }
        out
    }

    /// Per-message views.
    pub fn views(&self) -> &[MessageView] {
        &self.views
    }
}
