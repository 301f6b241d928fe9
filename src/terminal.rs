//! Terminal session guard: raw mode and screen setup for the chat view.

use crate::error::Result;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;

/// Terminal setup options.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Capture mouse events (needed for wheel scrolling).
    pub enable_mouse: bool,
    /// Draw on the alternate screen.
    pub alternate_screen: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enable_mouse: true,
            alternate_screen: true,
        }
    }
}

/// Holds the terminal in raw mode until dropped.
///
/// Dropping the session shows the cursor, releases the mouse, leaves the
/// alternate screen and disables raw mode. Teardown errors are ignored.
#[derive(Debug)]
pub struct TerminalSession {
    config: SessionConfig,
}

impl TerminalSession {
    /// Enter raw mode with the default options.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails.
    pub fn enter() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Enter raw mode with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails. Anything already switched
    /// on is restored before returning.
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on, Drop restores whatever was enabled.
        let session = Self { config };

        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        execute!(stdout, cursor::Hide)?;

        tracing::debug!(?config, "terminal session started");
        Ok(session)
    }

    /// Current terminal size as `(columns, rows)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    /// Options this session was entered with.
    pub const fn config(&self) -> SessionConfig {
        self.config
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.config.enable_mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        if self.config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
        tracing::debug!("terminal session restored");
    }
}
