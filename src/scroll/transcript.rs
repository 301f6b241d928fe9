//! Terminal transcript viewport: wrapped rows with a scroll position.
//!
//! Measures everything in rows. Text is wrapped to the column width with
//! display-width awareness, so wide glyphs and emoji take their real space.

use super::viewport::{ScrollBehavior, ScrollMetrics, Viewport};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Fraction of the remaining distance covered per animation step.
const EASING: f64 = 0.35;
/// Distance (in rows) under which a smooth scroll snaps to its target.
const SNAP_THRESHOLD: f64 = 0.5;

/// One display row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Row text.
    pub text: String,
    /// Whether this row continues the previous one (soft wrap).
    pub wrapped: bool,
}

impl Row {
    /// Create a new row.
    pub const fn new(text: String, wrapped: bool) -> Self {
        Self { text, wrapped }
    }

    /// Display width in columns.
    pub fn width(&self) -> usize {
        UnicodeWidthStr::width(self.text.as_str())
    }
}

/// Wrap `text` into rows at most `width` columns wide.
///
/// Hard newlines always start a new row. A zero width yields one row per
/// line, unwrapped.
pub fn wrap(text: &str, width: usize) -> Vec<Row> {
    let mut rows = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if width == 0 || line.is_empty() {
            rows.push(Row::new(line.to_owned(), false));
            continue;
        }

        let mut current = String::new();
        let mut col = 0;
        let mut wrapped = false;
        for grapheme in line.graphemes(true) {
            let w = UnicodeWidthStr::width(grapheme);
            if col + w > width && !current.is_empty() {
                rows.push(Row::new(std::mem::take(&mut current), wrapped));
                col = 0;
                wrapped = true;
            }
            current.push_str(grapheme);
            col += w;
        }
        rows.push(Row::new(current, wrapped));
    }

    rows
}

/// Scrollable, wrapped view of a transcript.
///
/// `scroll_top` counts rows from the top of the content. Appending content
/// leaves `scroll_top` alone, so a reader scrolled into history stays put
/// until something scrolls the view.
#[derive(Debug)]
pub struct TranscriptViewport {
    /// Unwrapped content.
    content: String,
    /// Wrapped rows.
    rows: Vec<Row>,
    /// Columns available.
    width: u16,
    /// Rows visible.
    height: u16,
    /// Current position (fractional while animating).
    scroll_top: f64,
    /// Smooth-scroll destination.
    target_top: f64,
}

impl TranscriptViewport {
    /// Create an empty viewport of the given size.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            content: String::new(),
            rows: Vec::new(),
            width,
            height,
            scroll_top: 0.0,
            target_top: 0.0,
        }
    }

    /// Replace the content, rewrapping it.
    pub fn set_content(&mut self, text: &str) {
        if self.content == text {
            return;
        }
        text.clone_into(&mut self.content);
        self.rewrap();
    }

    /// Resize the viewport, rewrapping the content.
    pub fn set_size(&mut self, width: u16, height: u16) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        let rewrap = width != self.width;
        self.width = width;
        self.height = height;
        if rewrap {
            self.rewrap();
        } else {
            self.clamp();
        }
    }

    /// Scroll by `rows` (positive = toward older content). Cancels any animation.
    pub fn scroll_by(&mut self, rows: i32) {
        let top = self.scroll_top.round() - f64::from(rows);
        self.scroll_top = top.clamp(0.0, self.max_scroll_top());
        self.target_top = self.scroll_top;
    }

    /// Scroll up `rows` rows.
    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_by(i32::from(rows));
    }

    /// Scroll down `rows` rows.
    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll_by(-i32::from(rows));
    }

    /// Scroll up one page.
    pub fn page_up(&mut self) {
        self.scroll_by(i32::from(self.page_rows()));
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        self.scroll_by(-i32::from(self.page_rows()));
    }

    /// Advance a smooth scroll by one frame. Returns whether the position moved.
    pub fn animate(&mut self) -> bool {
        let distance = self.target_top - self.scroll_top;
        if distance.abs() < f64::EPSILON {
            return false;
        }

        if distance.abs() < SNAP_THRESHOLD {
            self.scroll_top = self.target_top;
        } else {
            self.scroll_top += distance * EASING;
        }
        true
    }

    /// Whether a smooth scroll is still in flight.
    pub fn is_animating(&self) -> bool {
        (self.target_top - self.scroll_top).abs() >= f64::EPSILON
    }

    /// Rows currently on screen.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        let start = self.scroll_top.round().max(0.0) as usize;
        self.rows.iter().skip(start).take(usize::from(self.height))
    }

    /// All wrapped rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Columns available.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Rows visible.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Current scroll position in rows.
    pub const fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn page_rows(&self) -> u16 {
        self.height.saturating_sub(1).max(1)
    }

    #[allow(clippy::cast_precision_loss)]
    fn max_scroll_top(&self) -> f64 {
        self.rows.len().saturating_sub(usize::from(self.height)) as f64
    }

    fn rewrap(&mut self) {
        self.rows = wrap(&self.content, usize::from(self.width));
        self.clamp();
    }

    fn clamp(&mut self) {
        let max = self.max_scroll_top();
        self.scroll_top = self.scroll_top.clamp(0.0, max);
        self.target_top = self.target_top.clamp(0.0, max);
    }
}

impl Viewport for TranscriptViewport {
    #[allow(clippy::cast_precision_loss)]
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            self.scroll_top,
            self.rows.len() as f64,
            f64::from(self.height),
        )
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let top = top.clamp(0.0, self.max_scroll_top());
        self.target_top = top;
        if behavior == ScrollBehavior::Instant {
            self.scroll_top = top;
        }
    }
}
