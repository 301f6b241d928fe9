//! Reveal controller: paces the displayed text toward the source.

use super::config::RevealConfig;
use super::source::SourceCell;
use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};

/// Outcome of a single reveal tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Streaming, but the display has caught up with the source.
    Idle,
    /// The display grew: the cursor moved forward, or a grapheme already
    /// shown was completed by newly arrived marks (then `from == to`).
    Advanced {
        /// Cursor before the tick, in graphemes.
        from: usize,
        /// Cursor after the tick, in graphemes.
        to: usize,
    },
    /// Not streaming; the display already equals the source.
    Stopped,
}

/// Incremental reveal state for one message.
///
/// While streaming, each [`tick`](Self::tick) reveals a few more graphemes
/// of the source, with larger steps the further behind the display is.
/// When streaming stops the display snaps to the full source.
///
/// The source lives in a [`SourceCell`] so the producer can keep
/// appending between ticks without the tick loop being rebuilt.
#[derive(Debug)]
pub struct Reveal {
    /// Pacing configuration.
    config: RevealConfig,
    /// Latest source text.
    source: SourceCell,
    /// Revealed graphemes.
    cursor: usize,
    /// Byte offset of `cursor` within the source.
    cursor_byte: usize,
    /// `source[..cursor_byte]`, kept so reads don't touch the cell.
    displayed: String,
    /// Externally supplied streaming flag.
    streaming: bool,
}

impl Default for Reveal {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

impl Reveal {
    /// Create a controller with its own empty source.
    pub fn new(config: RevealConfig) -> Self {
        Self::with_source(SourceCell::new(), config)
    }

    /// Create a controller reading from an existing source cell.
    ///
    /// The controller starts stopped, so any text already in the cell is
    /// displayed in full.
    pub fn with_source(source: SourceCell, config: RevealConfig) -> Self {
        let mut reveal = Self {
            config,
            source,
            cursor: 0,
            cursor_byte: 0,
            displayed: String::new(),
            streaming: false,
        };
        reveal.flush();
        reveal
    }

    /// Feed the latest inputs and return the text to display.
    ///
    /// The cursor does not move here; that happens on [`tick`](Self::tick).
    /// A `false` flag flushes immediately.
    pub fn update(&mut self, source: &str, streaming: bool) -> &str {
        self.source.set(source);
        self.set_streaming(streaming);
        if !self.streaming {
            self.flush();
        }
        &self.displayed
    }

    /// Change the streaming flag.
    ///
    /// Turning streaming on starts a new message from an empty display.
    /// Turning it off reveals the whole source at once.
    pub fn set_streaming(&mut self, streaming: bool) {
        match (self.streaming, streaming) {
            (false, true) => {
                self.streaming = true;
                self.cursor = 0;
                self.cursor_byte = 0;
                self.displayed.clear();
                tracing::debug!("reveal session started");
            }
            (true, false) => {
                self.streaming = false;
                self.flush();
                tracing::debug!(cursor = self.cursor, "reveal session ended, flushed");
            }
            _ => {}
        }
    }

    /// Advance the display by one step.
    ///
    /// Reads the source cell every call, so text appended since the last
    /// tick is taken into account. A grapheme that was shown and has since
    /// been extended (a combining mark, a ZWJ sequence) is completed without
    /// being counted again.
    pub fn tick(&mut self) -> Step {
        if !self.streaming {
            return Step::Stopped;
        }

        let text = self.source.load();
        self.reconcile(&text);

        let start = grapheme_end(&text, self.cursor_byte);
        let rest = &text[start..];
        let delta = rest
            .graphemes(true)
            .take(self.config.jumps.saturation())
            .count();
        let jump = self.config.jumps.jump_for(delta, self.cursor);
        if jump == 0 && start == self.cursor_byte {
            return Step::Idle;
        }

        let advance: usize = rest.graphemes(true).take(jump).map(str::len).sum();
        let end = start + advance;
        self.displayed.push_str(&text[self.cursor_byte..end]);

        let from = self.cursor;
        self.cursor += jump;
        self.cursor_byte = end;

        tracing::trace!(from, to = self.cursor, delta, jump, "reveal advanced");
        Step::Advanced {
            from,
            to: self.cursor,
        }
    }

    /// The revealed text.
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Revealed graphemes.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether a streaming session is active.
    pub const fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Whether every grapheme of the current source is displayed.
    pub fn is_caught_up(&self) -> bool {
        self.cursor_byte == self.source.len()
    }

    /// Graphemes still waiting to be revealed.
    pub fn remaining(&self) -> usize {
        let text = self.source.load();
        if !text.is_char_boundary(self.cursor_byte) {
            return text.graphemes(true).count().saturating_sub(self.cursor);
        }
        text[grapheme_end(&text, self.cursor_byte)..]
            .graphemes(true)
            .count()
    }

    /// Handle to the source cell, for producers.
    pub const fn source(&self) -> &SourceCell {
        &self.source
    }

    /// Pacing configuration.
    pub const fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Show the whole source.
    fn flush(&mut self) {
        let text = self.source.load();
        if self.cursor_byte == text.len() && self.displayed == *text {
            return;
        }

        self.cursor = text.graphemes(true).count();
        self.cursor_byte = text.len();
        self.displayed.clear();
        self.displayed.push_str(&text);
    }

    /// Keep `displayed` a prefix of `text`.
    ///
    /// The source is append-only by contract. If it shrank or was rewritten,
    /// the cursor is clamped to the longest still-valid prefix.
    fn reconcile(&mut self, text: &str) {
        if text.get(..self.cursor_byte) == Some(self.displayed.as_str()) {
            return;
        }

        let mut end = self
            .displayed
            .char_indices()
            .zip(text.char_indices())
            .find(|((_, a), (_, b))| a != b)
            .map_or_else(|| self.displayed.len().min(text.len()), |((i, _), _)| i);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let end = grapheme_start(text, end);

        tracing::warn!(
            previous = self.cursor_byte,
            clamped = end,
            source_len = text.len(),
            "reveal source is not an extension of the displayed text; clamping"
        );

        self.displayed.truncate(end);
        self.cursor_byte = end;
        self.cursor = self.displayed.graphemes(true).count();
    }
}

/// End of the grapheme containing byte `at`, or `at` on a boundary.
fn grapheme_end(text: &str, at: usize) -> usize {
    let mut cursor = GraphemeCursor::new(at, text.len(), true);
    match cursor.is_boundary(text, 0) {
        Ok(false) => cursor
            .next_boundary(text, 0)
            .ok()
            .flatten()
            .unwrap_or(text.len()),
        Ok(true) | Err(_) => at,
    }
}

/// Start of the grapheme containing byte `at`, or `at` on a boundary.
fn grapheme_start(text: &str, at: usize) -> usize {
    let mut cursor = GraphemeCursor::new(at, text.len(), true);
    match cursor.is_boundary(text, 0) {
        Ok(false) => cursor.prev_boundary(text, 0).ok().flatten().unwrap_or(0),
        Ok(true) | Err(_) => at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::{JumpTable, JumpTier};

    fn streaming(source: &str) -> Reveal {
        let mut reveal = Reveal::default();
        reveal.update(source, true);
        reveal
    }

    fn run_to_idle(reveal: &mut Reveal) -> usize {
        let mut ticks = 0;
        while let Step::Advanced { .. } = reveal.tick() {
            ticks += 1;
            assert!(ticks < 10_000, "reveal never caught up");
        }
        ticks
    }

    #[test]
    fn test_starts_empty_when_streaming() {
        let mut reveal = Reveal::default();
        assert_eq!(reveal.update("Hello", true), "");
        assert_eq!(reveal.cursor(), 0);
    }

    #[test]
    fn test_not_streaming_shows_everything() {
        let mut reveal = Reveal::default();
        assert_eq!(reveal.update("Hello", false), "Hello");
        assert_eq!(reveal.cursor(), 5);
        assert_eq!(reveal.tick(), Step::Stopped);
    }

    #[test]
    fn test_jump_schedule_for_200_chars() {
        let source = "x".repeat(200);
        let mut reveal = streaming(&source);

        assert_eq!(reveal.tick(), Step::Advanced { from: 0, to: 20 });
        assert_eq!(reveal.tick(), Step::Advanced { from: 20, to: 40 });

        let mut cursors = vec![reveal.cursor()];
        while let Step::Advanced { to, .. } = reveal.tick() {
            cursors.push(to);
        }

        // 20-steps until the gap drops to 100, then 5s, 2s, and 1s.
        assert!(cursors.contains(&100));
        assert!(cursors.contains(&105));
        assert!(cursors.contains(&150));
        assert!(cursors.contains(&152));
        assert!(cursors.contains(&190));
        assert!(cursors.contains(&191));
        assert_eq!(*cursors.last().unwrap(), 200);
        assert_eq!(reveal.displayed(), source);
        assert_eq!(reveal.tick(), Step::Idle);
    }

    #[test]
    fn test_total_ticks_for_200_chars() {
        let mut reveal = streaming(&"y".repeat(200));
        // 5 ticks of 20, 10 of 5, 20 of 2, 10 of 1.
        assert_eq!(run_to_idle(&mut reveal), 45);
    }

    #[test]
    fn test_kickstart_then_single_steps() {
        let mut reveal = streaming("abcdefgh");
        assert_eq!(reveal.tick(), Step::Advanced { from: 0, to: 2 });
        assert_eq!(reveal.tick(), Step::Advanced { from: 2, to: 4 });
        assert_eq!(reveal.tick(), Step::Advanced { from: 4, to: 6 });
        assert_eq!(reveal.tick(), Step::Advanced { from: 6, to: 7 });
        assert_eq!(reveal.displayed(), "abcdefg");
    }

    #[test]
    fn test_tick_reads_latest_source() {
        let mut reveal = streaming("ab");
        let producer = reveal.source().clone();

        assert_eq!(reveal.tick(), Step::Advanced { from: 0, to: 2 });
        assert_eq!(reveal.tick(), Step::Idle);

        producer.append("cdefgh");
        assert_eq!(reveal.tick(), Step::Advanced { from: 2, to: 4 });
        assert_eq!(reveal.tick(), Step::Advanced { from: 4, to: 6 });
        assert_eq!(reveal.tick(), Step::Advanced { from: 6, to: 7 });
        assert_eq!(reveal.displayed(), "abcdefg");
    }

    #[test]
    fn test_cursor_monotonic_under_growth() {
        let mut reveal = streaming("");
        let producer = reveal.source().clone();
        // Chunks that split grapheme clusters across appends.
        let chunks = ["e", "\u{301}", "token ", "👨", "\u{200d}👩", "\u{200d}👧", " ok\r", "\n"];
        let mut last = 0;

        for i in 0..300 {
            if i % 3 == 0 {
                producer.append(chunks[(i / 3) % chunks.len()]);
            }
            reveal.tick();
            let source_len = producer.load().graphemes(true).count();
            assert!(reveal.cursor() >= last);
            assert!(reveal.cursor() <= source_len);
            assert!(producer.load().starts_with(reveal.displayed()));
            last = reveal.cursor();
        }

        reveal.set_streaming(false);
        assert_eq!(reveal.cursor(), producer.load().graphemes(true).count());
    }

    #[test]
    fn test_combining_mark_in_later_chunk() {
        let mut reveal = streaming("e");
        assert_eq!(reveal.tick(), Step::Advanced { from: 0, to: 1 });

        reveal.source().append("\u{301}");
        assert_eq!(reveal.tick(), Step::Advanced { from: 1, to: 1 });
        assert_eq!(reveal.displayed(), "e\u{301}");
        assert_eq!(reveal.cursor(), 1);
        assert_eq!(reveal.remaining(), 0);
        assert_eq!(reveal.tick(), Step::Idle);

        reveal.set_streaming(false);
        assert_eq!(reveal.cursor(), 1);
    }

    #[test]
    fn test_zwj_sequence_in_later_chunk() {
        let mut reveal = streaming("👨");
        reveal.tick();
        assert_eq!(reveal.cursor(), 1);

        reveal.source().append("\u{200d}👩\u{200d}👧 hi");
        reveal.tick();
        assert!(reveal.displayed().starts_with("👨\u{200d}👩\u{200d}👧"));
        assert_eq!(reveal.cursor(), 3);

        assert_eq!(reveal.update("👨\u{200d}👩\u{200d}👧 hi", false), "👨\u{200d}👩\u{200d}👧 hi");
        assert_eq!(reveal.cursor(), 4);
    }

    #[test]
    fn test_flush_counts_whole_source() {
        let mut reveal = streaming("👨");
        reveal.tick();
        reveal.update("👨\u{200d}👩\u{200d}👧", false);
        assert_eq!(reveal.cursor(), 1);
    }

    #[test]
    fn test_large_backlog_uses_top_tier() {
        let mut reveal = streaming(&"x".repeat(5000));
        assert_eq!(reveal.tick(), Step::Advanced { from: 0, to: 20 });
        assert_eq!(reveal.remaining(), 4980);
    }

    #[test]
    fn test_stop_flushes_mid_reveal() {
        let source = "z".repeat(500);
        let mut reveal = streaming(&source);
        reveal.tick();
        reveal.tick();
        assert_eq!(reveal.cursor(), 40);

        reveal.set_streaming(false);
        assert_eq!(reveal.displayed(), source);
        assert_eq!(reveal.cursor(), 500);
        assert_eq!(reveal.tick(), Step::Stopped);
    }

    #[test]
    fn test_update_with_stop_flushes_latest_source() {
        let mut reveal = streaming("partial");
        reveal.tick();
        assert_eq!(reveal.update("partial and final", false), "partial and final");
    }

    #[test]
    fn test_empty_source_stays_empty() {
        let mut reveal = streaming("");
        assert_eq!(reveal.tick(), Step::Idle);
        assert_eq!(reveal.displayed(), "");
        assert!(reveal.is_caught_up());
    }

    #[test]
    fn test_restart_resets_cursor() {
        let mut reveal = Reveal::default();
        reveal.update("first message", false);
        assert_eq!(reveal.cursor(), 13);

        reveal.update("second", true);
        assert_eq!(reveal.displayed(), "");
        assert_eq!(reveal.tick(), Step::Advanced { from: 0, to: 2 });
        assert_eq!(reveal.displayed(), "se");
    }

    #[test]
    fn test_shrinking_source_is_clamped() {
        let mut reveal = streaming(&"a".repeat(60));
        reveal.tick();
        assert_eq!(reveal.cursor(), 5);

        reveal.update("aaa", true);
        assert_eq!(reveal.tick(), Step::Idle);
        assert_eq!(reveal.displayed(), "aaa");
        assert_eq!(reveal.cursor(), 3);
    }

    #[test]
    fn test_rewritten_source_is_clamped_to_common_prefix() {
        let mut reveal = streaming("hello world");
        reveal.tick();
        reveal.tick();
        assert_eq!(reveal.displayed(), "hell");

        reveal.update("help me", true);
        reveal.tick();
        assert!(reveal.displayed().starts_with("hel"));
        assert!("help me".starts_with(reveal.displayed()));
    }

    #[test]
    fn test_multibyte_graphemes_never_split() {
        let source = "héllo 👋🏽 wörld ";
        let mut reveal = streaming(source);
        while let Step::Advanced { .. } = reveal.tick() {
            assert!(source.starts_with(reveal.displayed()));
        }
        assert_eq!(reveal.displayed(), source);
        assert_eq!(reveal.cursor(), source.graphemes(true).count());
    }

    #[test]
    fn test_custom_jump_table() {
        let config = RevealConfig::default()
            .with_jumps(JumpTable::default().with_tiers([JumpTier::new(0, 50)]));
        let mut reveal = Reveal::new(config);
        reveal.update(&"q".repeat(120), true);
        assert_eq!(reveal.tick(), Step::Advanced { from: 0, to: 50 });
        assert_eq!(reveal.tick(), Step::Advanced { from: 50, to: 100 });
        assert_eq!(reveal.tick(), Step::Advanced { from: 100, to: 120 });
    }

    #[test]
    fn test_with_source_starts_flushed() {
        let cell = SourceCell::with_text("history");
        let reveal = Reveal::with_source(cell, RevealConfig::default());
        assert_eq!(reveal.displayed(), "history");
        assert!(!reveal.is_streaming());
    }
}
