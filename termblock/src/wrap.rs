//! Line wrapping for block content.
//!
//! Turns arbitrary text into a sequence of fixed-width display lines.
//! Text is first split on embedded `\n` into logical lines, then each
//! logical line is wrapped according to a [`WrapMode`]. Widths are
//! counted in `char`s, matching what a terminal cell roughly holds.
//!
//! All functions here are pure; the same input always produces the
//! same output.

use crate::printer::PrinterError;

/// How a logical line that exceeds the wrap width is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Overflowing lines continue on additional physical lines.
    #[default]
    Split,
    /// Overflowing lines are truncated; one physical line per logical line.
    Cut,
}

/// Split a single logical line into physical lines of at most `width` chars.
///
/// A line of length L yields `ceil(L / width)` physical lines, the last
/// one possibly shorter. An empty line yields one empty physical line.
///
/// # Panics
///
/// Panics if `width` is zero. [`wrap`] is the validating entry point.
pub fn split_line(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Truncate a single logical line to its first `width` chars.
///
/// Characters beyond `width` are dropped, not wrapped.
pub fn cut_line(line: &str, width: usize) -> String {
    line.chars().take(width).collect()
}

/// Wrap `text` into display lines of at most `width` chars each.
///
/// The text is split on `\n` into logical lines first; each logical line
/// is then wrapped per `mode`.
///
/// # Errors
///
/// Returns [`PrinterError::InvalidWidth`] if `width` is zero.
pub fn wrap(text: &str, width: usize, mode: WrapMode) -> Result<Vec<String>, PrinterError> {
    if width == 0 {
        return Err(PrinterError::InvalidWidth);
    }

    let mut lines = Vec::new();
    for logical in text.split('\n') {
        match mode {
            WrapMode::Split => lines.extend(split_line(logical, width)),
            WrapMode::Cut => lines.push(cut_line(logical, width)),
        }
    }
    Ok(lines)
}
