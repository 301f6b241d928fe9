//! Reveal clock: one ticker per streaming session.
//!
//! The ticker is started when a session begins and cancelled when it ends
//! or when the clock is dropped. Source growth in between never restarts
//! it; the tick handler reads the [`SourceCell`](super::SourceCell) instead.

use crate::actor::{Tick, TickerActor};
use crate::error::Result;
use crossbeam_channel::{never, Receiver};
use std::time::Duration;

/// Session-scoped periodic timer for reveal ticks.
pub struct RevealClock {
    /// Tick period.
    interval: Duration,
    /// Running ticker, if a session is active.
    ticker: Option<TickerActor>,
    /// Receiver that never fires, handed out while idle.
    idle: Receiver<Tick>,
}

impl RevealClock {
    /// Create a stopped clock.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ticker: None,
            idle: never(),
        }
    }

    /// Start or stop the ticker to match the streaming flag.
    ///
    /// Starting an already running clock, or stopping a stopped one, does
    /// nothing.
    pub fn sync(&mut self, streaming: bool) -> Result<()> {
        match (streaming, self.ticker.is_some()) {
            (true, false) => {
                self.ticker = Some(TickerActor::spawn(self.interval)?);
                tracing::debug!(interval_ms = self.interval.as_millis(), "reveal clock started");
            }
            (false, true) => self.stop(),
            _ => {}
        }
        Ok(())
    }

    /// Cancel the ticker, if running.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.join();
            tracing::debug!("reveal clock stopped");
        }
    }

    /// Whether a ticker is running.
    pub const fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Tick receiver for `select!` loops. Never fires while stopped.
    pub fn receiver(&self) -> &Receiver<Tick> {
        self.ticker
            .as_ref()
            .map_or(&self.idle, TickerActor::receiver)
    }

    /// Tick period.
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for RevealClock {
    fn drop(&mut self) {
        self.stop();
    }
}
