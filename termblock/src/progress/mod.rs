//! Progress bars.
//!
//! Two flavours share one formatting core:
//!
//! - [`ProgressBar`] repaints a single line in place with a plain
//!   carriage return. Cheap and dependency-free, but it owns the whole
//!   line: running several at once corrupts the display.
//! - [`BlockBar`] renders through an owned [`Block`](crate::Block), so
//!   any number of bars (and other blocks) can update concurrently from
//!   different threads without stepping on each other.
//!
//! A bar with an unknown total (`total == 0`) renders an indefinite
//! four-phase animation instead of a percentage.
//!
//! ```text
//! <desc> [####      ] 40.00 % [00:12 | 00:18]
//!        |----------|           elapsed | remaining
//!          bar_width
//! ```

mod bar;
mod block_bar;

pub use bar::{ProgressBar, ProgressIter};
pub use block_bar::BlockBar;

use std::time::{Duration, Instant};

use crate::fmt::format_seconds;
use crate::wrap::cut_line;

/// Fill character for the completed part of a bar.
const BAR_FILL: char = '#';

/// Default width of the bar glyph run, in columns.
pub const DEFAULT_BAR_WIDTH: usize = 36;

/// Visual configuration shared by both bar flavours.
#[derive(Debug, Clone)]
pub struct BarStyle {
    /// Description prefix, rendered before the bar.
    pub desc: String,
    /// Width of the glyph run between the brackets.
    pub bar_width: usize,
    /// Whether to append the elapsed/remaining time suffix.
    pub show_time: bool,
    /// Maximum total width of the rendered line. Only ever shrinks the
    /// description; the bar and time suffix keep their room.
    pub max_width: Option<usize>,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            desc: String::new(),
            bar_width: DEFAULT_BAR_WIDTH,
            show_time: true,
            max_width: None,
        }
    }
}

impl BarStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Description prefix.
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Width of the bar glyph run.
    pub fn bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// Drop the time suffix.
    pub fn hide_time(mut self) -> Self {
        self.show_time = false;
        self
    }

    /// Cap the total rendered width, truncating the description.
    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Counting state shared by both bar flavours.
#[derive(Debug)]
pub(crate) struct BarState {
    pub(crate) count: u64,
    pub(crate) total: u64,
    pub(crate) fraction_override: Option<f64>,
    pub(crate) started: Instant,
    pub(crate) style: BarStyle,
}

impl BarState {
    pub(crate) fn new(total: u64, style: BarStyle) -> Self {
        Self {
            count: 0,
            total,
            fraction_override: None,
            started: Instant::now(),
            style,
        }
    }

    /// Pin the state to its terminal value: the count reaches the total
    /// and an explicit fraction, if one was ever set, becomes 1.0.
    pub(crate) fn finish(&mut self) {
        if self.fraction_override.is_some() {
            self.fraction_override = Some(1.0);
        }
        self.count = self.total;
    }

    /// Current progress fraction and whether the bar is in dummy
    /// (unknown-total) mode.
    ///
    /// In dummy mode the fraction cycles through four phases with the
    /// update count and is forced to 1.0 once `count == total`, which
    /// only holds after [`finish`](Self::finish).
    pub(crate) fn fraction(&self) -> (f64, bool) {
        if let Some(fraction) = self.fraction_override {
            return (fraction, false);
        }
        if self.total == 0 {
            let fraction = if self.count == self.total {
                1.0
            } else {
                (self.count % 4) as f64 / 3.0
            };
            (fraction, true)
        } else {
            (self.count as f64 / self.total as f64, false)
        }
    }

    /// Render the bar for a given elapsed time.
    ///
    /// Taking the elapsed time as a parameter keeps this deterministic;
    /// callers pass `started.elapsed()`.
    pub(crate) fn format_at(&self, elapsed: Duration) -> String {
        let (fraction, dummy) = self.fraction();

        // The fill saturates at the bar width; the fraction itself is
        // allowed to pass 1.0 when the count overshoots the total.
        let width = self.style.bar_width;
        let filled = ((fraction * width as f64).round() as usize).min(width);

        let mut bar = String::with_capacity(width + 24);
        bar.push('[');
        for _ in 0..filled {
            bar.push(BAR_FILL);
        }
        for _ in filled..width {
            bar.push(' ');
        }
        bar.push(']');

        if !dummy {
            bar.push_str(&format!(" {:.2} %", fraction * 100.0));
        }

        if self.style.show_time {
            let secs = elapsed.as_secs_f64();
            if dummy {
                bar.push_str(&format!(" [{}]", format_seconds(secs)));
            } else {
                let remaining = if fraction > 0.0 {
                    format_seconds(secs / fraction - secs)
                } else {
                    "inf".to_string()
                };
                bar.push_str(&format!(" [{} | {}]", format_seconds(secs), remaining));
            }
        }

        let desc = match self.style.max_width {
            Some(max) => {
                let room = max.saturating_sub(bar.chars().count() + 1);
                cut_line(&self.style.desc, room)
            }
            None => self.style.desc.clone(),
        };

        format!("{desc} {bar}")
    }
}
