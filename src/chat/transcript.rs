//! Conversation state fed by the reply stream.

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person typing.
    User,
    /// The chatbot.
    Assistant,
}

impl Role {
    /// Short label used when rendering.
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Author.
    pub role: Role,
    /// Full text received so far.
    pub content: String,
    /// Whether more text is still arriving.
    pub streaming: bool,
}

impl ChatMessage {
    /// A finished user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            streaming: false,
        }
    }

    /// A finished assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            streaming: false,
        }
    }

    /// An empty assistant message waiting for its reply stream.
    pub const fn placeholder() -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            streaming: true,
        }
    }
}

/// Ordered conversation plus the server-side chat id.
///
/// Every mutation bumps [`revision`](Self::revision), which makes a cheap
/// dependency for [`ScrollController::on_content_changed`](crate::scroll::ScrollController::on_content_changed).
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    chat_id: Option<String>,
    revision: u64,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript from previously loaded messages.
    pub fn with_history(chat_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            chat_id: Some(chat_id.into()),
            revision: 0,
        }
    }

    /// Append the user's message. Empty text is ignored.
    pub fn push_user(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.messages.push(ChatMessage::user(text));
        self.bump();
        true
    }

    /// Start a streaming assistant reply.
    pub fn begin_assistant(&mut self) {
        self.messages.push(ChatMessage::placeholder());
        self.bump();
    }

    /// Append decoded text to the streaming reply.
    ///
    /// Returns `false` (and drops the text) when no reply is streaming.
    pub fn append_chunk(&mut self, chunk: &str) -> bool {
        if chunk.is_empty() {
            return false;
        }
        match self.streaming_reply_mut() {
            Some(reply) => {
                reply.content.push_str(chunk);
                self.bump();
                true
            }
            None => {
                tracing::warn!(bytes = chunk.len(), "dropping chunk with no streaming reply");
                false
            }
        }
    }

    /// The reply stream ended normally.
    pub fn finish(&mut self) -> bool {
        let finished = self.end_streaming();
        if finished {
            tracing::debug!(revision = self.revision, "reply finished");
        }
        finished
    }

    /// The user aborted the reply; keep what arrived so far.
    pub fn stop(&mut self) -> bool {
        let stopped = self.end_streaming();
        if stopped {
            tracing::debug!(revision = self.revision, "reply stopped by user");
        }
        stopped
    }

    /// The request failed: end any streaming reply and add an error message.
    pub fn fail(&mut self, text: &str) {
        self.end_streaming();
        self.messages.push(ChatMessage::assistant(text));
        self.bump();
    }

    /// Remove the last message if it is an assistant reply (before regenerating).
    pub fn drop_trailing_assistant(&mut self) -> Option<ChatMessage> {
        if self.messages.last()?.role != Role::Assistant {
            return None;
        }
        let dropped = self.messages.pop();
        self.bump();
        dropped
    }

    /// Replace the last reply with a fresh streaming one.
    ///
    /// Only a conversation the server knows (it has a chat id) can be
    /// regenerated, and not while a reply is streaming. Returns whether a
    /// new reply was started.
    pub fn regenerate(&mut self) -> bool {
        if self.chat_id.is_none() || self.is_streaming() {
            return false;
        }
        self.drop_trailing_assistant();
        self.begin_assistant();
        tracing::debug!(revision = self.revision, "regenerating last reply");
        true
    }

    /// Forget every message and the chat id.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.chat_id = None;
        self.bump();
        tracing::debug!("transcript cleared");
    }

    /// Take the server's chat id if none is known yet.
    pub fn adopt_chat_id(&mut self, header: Option<&str>) -> bool {
        match header {
            Some(id) if self.chat_id.is_none() && !id.trim().is_empty() => {
                self.chat_id = Some(id.trim().to_owned());
                tracing::debug!(chat_id = id, "adopted chat id");
                true
            }
            _ => false,
        }
    }

    /// Server-side chat id, once known.
    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    /// Messages in order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Last message.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Whether a reply is streaming.
    pub fn is_streaming(&self) -> bool {
        self.messages.last().is_some_and(|m| m.streaming)
    }

    /// Mutation counter.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn streaming_reply_mut(&mut self) -> Option<&mut ChatMessage> {
        self.messages
            .last_mut()
            .filter(|m| m.role == Role::Assistant && m.streaming)
    }

    fn end_streaming(&mut self) -> bool {
        match self.streaming_reply_mut() {
            Some(reply) => {
                reply.streaming = false;
                self.bump();
                true
            }
            None => false,
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_lifecycle() {
        let mut transcript = Transcript::new();
        assert!(transcript.push_user("hi"));
        transcript.begin_assistant();
        assert!(transcript.is_streaming());

        assert!(transcript.append_chunk("Hel"));
        assert!(transcript.append_chunk("lo"));
        assert!(transcript.finish());

        let last = transcript.last().unwrap();
        assert_eq!(last.content, "Hello");
        assert!(!last.streaming);
        assert!(!transcript.is_streaming());
    }

    #[test]
    fn test_revision_bumps_on_every_change() {
        let mut transcript = Transcript::new();
        let r0 = transcript.revision();
        transcript.push_user("q");
        transcript.begin_assistant();
        transcript.append_chunk("a");
        assert_eq!(transcript.revision(), r0 + 3);
    }

    #[test]
    fn test_empty_user_message_ignored() {
        let mut transcript = Transcript::new();
        assert!(!transcript.push_user(""));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_chunk_without_reply_dropped() {
        let mut transcript = Transcript::new();
        transcript.push_user("q");
        assert!(!transcript.append_chunk("stray"));
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_stop_keeps_partial_text() {
        let mut transcript = Transcript::new();
        transcript.begin_assistant();
        transcript.append_chunk("partial");
        assert!(transcript.stop());
        assert!(!transcript.stop());
        assert_eq!(transcript.last().unwrap().content, "partial");
    }

    #[test]
    fn test_fail_ends_stream_and_reports() {
        let mut transcript = Transcript::new();
        transcript.begin_assistant();
        transcript.fail("Sorry, something went wrong.");
        assert_eq!(transcript.len(), 2);
        assert!(!transcript.messages()[0].streaming);
        assert_eq!(
            transcript.last(),
            Some(&ChatMessage::assistant("Sorry, something went wrong."))
        );
    }

    #[test]
    fn test_regenerate_drops_only_assistant() {
        let mut transcript = Transcript::new();
        transcript.push_user("q");
        assert_eq!(transcript.drop_trailing_assistant(), None);

        transcript.begin_assistant();
        transcript.append_chunk("old answer");
        transcript.finish();
        let dropped = transcript.drop_trailing_assistant().unwrap();
        assert_eq!(dropped.content, "old answer");
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_regenerate_needs_chat_id_and_idle_reply() {
        let mut transcript = Transcript::new();
        transcript.push_user("q");
        transcript.begin_assistant();
        transcript.append_chunk("first");
        assert!(!transcript.regenerate());

        transcript.adopt_chat_id(Some("c1"));
        assert!(!transcript.regenerate());

        transcript.finish();
        assert!(transcript.regenerate());
        assert_eq!(transcript.len(), 2);
        assert!(transcript.is_streaming());
        assert_eq!(transcript.last(), Some(&ChatMessage::placeholder()));
        assert_eq!(transcript.messages()[0], ChatMessage::user("q"));
    }

    #[test]
    fn test_clear_forgets_messages_and_id() {
        let mut transcript =
            Transcript::with_history("old", vec![ChatMessage::user("a"), ChatMessage::assistant("b")]);
        let before = transcript.revision();
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.chat_id(), None);
        assert!(transcript.revision() > before);
        assert!(transcript.adopt_chat_id(Some("fresh")));
    }

    #[test]
    fn test_first_chat_id_wins() {
        let mut transcript = Transcript::new();
        assert!(!transcript.adopt_chat_id(None));
        assert!(!transcript.adopt_chat_id(Some("  ")));
        assert!(transcript.adopt_chat_id(Some("abc-123")));
        assert!(!transcript.adopt_chat_id(Some("zzz")));
        assert_eq!(transcript.chat_id(), Some("abc-123"));
    }

    #[test]
    fn test_history_keeps_existing_id() {
        let mut transcript =
            Transcript::with_history("old", vec![ChatMessage::user("a"), ChatMessage::assistant("b")]);
        assert!(!transcript.adopt_chat_id(Some("new")));
        assert_eq!(transcript.chat_id(), Some("old"));
        assert_eq!(Role::Assistant.label(), "assistant");
    }
}
