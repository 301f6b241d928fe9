//! Ticker Actor: Dedicated thread for generating timing events.
//!
//! This actor provides the periodic "tick" that paces the reveal of
//! streamed text. It decouples timing from the main thread so the view's
//! loop can `select!` on ticks, input and stream events together.
//!
//! The thread waits on a stop channel between ticks, so stopping it wakes
//! it immediately instead of waiting out the current interval.

use crate::error::{Error, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick event sent at regular intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Sequence number (monotonically increasing, gaps mean dropped ticks).
    pub seq: u64,
    /// Time elapsed since the ticker was started.
    pub elapsed: Duration,
    /// Ticks dropped since the previous delivered one because the receiver
    /// was busy.
    pub missed: u64,
}

/// Ticker actor that generates regular timing events.
pub struct TickerActor {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Dropping or sending on this stops the thread.
    stop_tx: Option<Sender<()>>,
    /// Receiver for tick events.
    tick_rx: Receiver<Tick>,
}

impl TickerActor {
    /// Thread name used for the ticker thread.
    pub const THREAD_NAME: &'static str = "driftview-ticker";

    /// Spawn a ticker actor with the given interval.
    ///
    /// # Arguments
    ///
    /// * `interval` - Time between ticks (e.g., 10ms to pace the reveal).
    ///
    /// # Returns
    ///
    /// The ticker actor, with its tick receiver available through
    /// [`receiver`](Self::receiver).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the OS refuses to start the thread.
    pub fn spawn(interval: Duration) -> Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        // One slot: a slow receiver finds at most one queued tick.
        let (tick_tx, tick_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name(Self::THREAD_NAME.to_owned())
            .spawn(move || run_loop(&tick_tx, &stop_rx, interval))
            .map_err(|source| Error::Spawn {
                name: Self::THREAD_NAME,
                source,
            })?;

        Ok(Self {
            handle: Some(handle),
            stop_tx: Some(stop_tx),
            tick_rx,
        })
    }

    /// Tick receiver, for `select!` loops:
    ///
    /// ```ignore
    /// select! {
    ///     recv(input_rx) -> event => handle_input(event),
    ///     recv(ticker.receiver()) -> _ => { reveal.tick(); }
    /// }
    /// ```
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the ticker to stop without waiting for it.
    pub fn shutdown(&mut self) {
        // Dropping the sender disconnects the stop channel.
        self.stop_tx.take();
    }

    /// Stop the ticker and wait for its thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(tick_tx: &Sender<Tick>, stop_rx: &Receiver<()>, interval: Duration) {
    let start = Instant::now();
    let mut next = start + interval;
    let mut seq = 0u64;
    let mut missed = 0u64;

    loop {
        let wait = next.saturating_duration_since(Instant::now());
        match stop_rx.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let now = Instant::now();
        let tick = Tick {
            seq,
            elapsed: now - start,
            missed,
        };
        match tick_tx.try_send(tick) {
            Ok(()) => missed = 0,
            Err(TrySendError::Full(_)) => missed += 1,
            Err(TrySendError::Disconnected(_)) => break,
        }
        seq += 1;

        next += interval;
        if next < now {
            // Fell behind (suspended, overloaded): restart the schedule.
            next = now + interval;
        }
    }

    tracing::trace!(ticks = seq, "ticker stopped");
}
