//! Message types for actor communication.
//!
//! These enums define the protocol between the input thread, the stream
//! producer and the chat view's main loop.

/// Key codes the chat view reacts to.
///
/// A subset of crossterm's `KeyCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Escape key.
    Esc,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Control only.
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };

    /// Check if any modifier is active.
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt
    }
}

/// Events from the input thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key {
        /// The key code.
        code: KeyCode,
        /// Modifiers held during keypress.
        modifiers: KeyModifiers,
    },

    /// Mouse wheel moved (positive = up, negative = down).
    Scroll {
        /// Wheel notches.
        delta: i16,
    },

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}

/// What a chat view should do in response to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewIntent {
    /// Scroll by rows (positive = toward older content).
    ScrollRows(i32),
    /// Scroll up one page.
    PageUp,
    /// Scroll down one page.
    PageDown,
    /// Jump to the newest content and re-pin.
    JumpToBottom,
    /// Type a character into the composer.
    Type(char),
    /// Delete the last composer character.
    Erase,
    /// Send the composed message.
    Send,
    /// Stop the reply being streamed.
    Stop,
    /// Replace the last reply with a fresh one.
    Regenerate,
    /// Start over with an empty conversation.
    NewChat,
    /// Leave the application.
    Quit,
}

impl InputEvent {
    /// Map an input event to a chat-view intent.
    ///
    /// Returns `None` for events the view handles elsewhere (resize) or
    /// ignores.
    pub fn intent(&self) -> Option<ViewIntent> {
        match *self {
            Self::Key { code, modifiers } => Some(match code {
                KeyCode::Char('c') if modifiers.control => ViewIntent::Quit,
                KeyCode::Char('s') if modifiers.control => ViewIntent::Stop,
                KeyCode::Char('r') if modifiers.control => ViewIntent::Regenerate,
                KeyCode::Char('n') if modifiers.control => ViewIntent::NewChat,
                KeyCode::Char(c) => ViewIntent::Type(c),
                KeyCode::Backspace => ViewIntent::Erase,
                KeyCode::Enter => ViewIntent::Send,
                KeyCode::Up => ViewIntent::ScrollRows(1),
                KeyCode::Down => ViewIntent::ScrollRows(-1),
                KeyCode::PageUp => ViewIntent::PageUp,
                KeyCode::PageDown => ViewIntent::PageDown,
                KeyCode::End => ViewIntent::JumpToBottom,
                KeyCode::Home => ViewIntent::ScrollRows(i32::MAX),
                KeyCode::Esc => ViewIntent::Quit,
            }),
            Self::Scroll { delta } => Some(ViewIntent::ScrollRows(i32::from(delta) * 3)),
            Self::Shutdown => Some(ViewIntent::Quit),
            Self::Resize { .. } | Self::Error(_) => None,
        }
    }
}

/// Events from the reply producer (network reader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The reply body started; carries the chat id header if present.
    Started {
        /// Server-assigned conversation id.
        chat_id: Option<String>,
    },

    /// Raw body bytes, possibly splitting a UTF-8 sequence.
    Chunk(Vec<u8>),

    /// The body ended normally.
    Finished,

    /// The request failed.
    Failed(String),
}
