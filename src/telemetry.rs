//! Process-wide tracing setup.
//!
//! Call [`init`] (or [`init_with`]) once at application start. Later calls
//! are no-ops, so libraries and demos can both call it without fighting over
//! the global subscriber.
//!
//! While a [`TerminalSession`](crate::terminal::TerminalSession) owns the
//! screen, stderr lands on top of the drawn frame. Log to a file then,
//! either with `DRIFTVIEW_LOG_FILE` or [`LogTarget::File`].

use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "DRIFTVIEW_LOG";

/// Environment variable naming a log file (appended to).
pub const LOG_FILE_ENV: &str = "DRIFTVIEW_LOG_FILE";

/// Filter used when [`LOG_ENV`] is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

static INIT: Once = Once::new();
static INIT_ERROR: Mutex<Option<String>> = Mutex::new(None);

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogTarget {
    /// Standard error. Fine for plain CLIs, not for full-screen views.
    #[default]
    Stderr,
    /// Append to a file, created if missing.
    File(PathBuf),
}

impl LogTarget {
    /// [`LOG_FILE_ENV`] if set, stderr otherwise.
    pub fn from_env() -> Self {
        std::env::var_os(LOG_FILE_ENV).map_or(Self::Stderr, |path| Self::File(path.into()))
    }

    /// Keep an explicit file target, otherwise use `path`.
    #[must_use]
    pub fn or_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Stderr => Self::File(path.into()),
            file @ Self::File(_) => file,
        }
    }
}

/// Install the global `tracing` subscriber, targeting [`LogTarget::from_env`].
pub fn init() -> Result<()> {
    init_with(LogTarget::from_env())
}

/// Install the global `tracing` subscriber writing to `target`.
///
/// Only the first call does any work; its outcome is remembered and
/// returned to every caller, whatever target they pass.
pub fn init_with(target: LogTarget) -> Result<()> {
    INIT.call_once(|| {
        if let Err(message) = install(&target) {
            if let Ok(mut slot) = INIT_ERROR.lock() {
                *slot = Some(message);
            }
        }
    });

    let failure = INIT_ERROR.lock().ok().and_then(|slot| slot.clone());
    failure.map_or(Ok(()), |message| Err(Error::Telemetry(message)))
}

fn install(target: &LogTarget) -> std::result::Result<(), String> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(path)
                .map_err(|e| format!("cannot open log file {}: {e}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    }
    .map_err(|e| e.to_string())
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
