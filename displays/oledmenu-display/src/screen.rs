//! Text runs of a frame
//!
//! The raster target does not carry glyph bitmaps. Instead every string the
//! menu draws is kept as a run (position, font, text), which is enough to
//! inspect what a frame shows.

use heapless::{String, Vec};
use oledmenu_core::FontId;

/// Maximum runs kept per frame
pub const MAX_RUNS: usize = 16;

/// Maximum bytes kept per run
pub const RUN_LEN: usize = 32;

/// One `draw_text` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Left edge in pixels (negative when scrolled)
    pub x: i32,
    /// Baseline in pixels
    pub baseline: i32,
    /// Font in effect
    pub font: FontId,
    /// Drawn text, truncated to [`RUN_LEN`] bytes
    pub text: String<RUN_LEN>,
}

/// Text content of one frame
#[derive(Debug, Clone, Default)]
pub struct Screen {
    runs: Vec<TextRun, MAX_RUNS>,
    /// Runs dropped because the frame was full
    dropped: usize,
}

impl Screen {
    /// Create an empty screen
    pub const fn new() -> Self {
        Self {
            runs: Vec::new(),
            dropped: 0,
        }
    }

    /// Forget every run
    pub fn clear(&mut self) {
        self.runs.clear();
        self.dropped = 0;
    }

    /// Record a run
    pub fn push(&mut self, x: i32, baseline: i32, font: FontId, text: &str) {
        let mut kept = String::new();
        // Truncate on a char boundary
        for c in text.chars() {
            if kept.push(c).is_err() {
                break;
            }
        }
        let run = TextRun {
            x,
            baseline,
            font,
            text: kept,
        };
        if self.runs.push(run).is_err() {
            self.dropped += 1;
        }
    }

    /// Runs in drawing order
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Text of each run in drawing order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.runs.iter().map(|run| run.text.as_str())
    }

    /// Text of the run drawn at `baseline`
    pub fn line_at(&self, baseline: i32) -> Option<&str> {
        self.runs
            .iter()
            .find(|run| run.baseline == baseline)
            .map(|run| run.text.as_str())
    }

    /// Runs that did not fit
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Check if nothing was drawn
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, run) in self.runs.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", run.text.as_str());
        }
        defmt::write!(f, "]");
    }
}
