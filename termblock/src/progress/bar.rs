//! Single-line carriage-return progress bar.

use std::io::{self, Write};
use std::time::Duration;

use super::{BarState, BarStyle};

/// A progress bar that repaints one line in place.
///
/// Each render overwrites the previous one with a plain carriage
/// return; there is no erase-to-end-of-line step, so the rendered
/// string is right-padded to the longest length ever produced to cover
/// stale trailing characters when the line shrinks (only the remaining
/// time can shrink mid-run).
///
/// This variant owns the whole terminal line. For several concurrent
/// bars, or bars mixed with other status output, use
/// [`BlockBar`](super::BlockBar).
///
/// ```no_run
/// use termblock::{BarStyle, ProgressBar};
///
/// let mut bar = ProgressBar::with_style(100, BarStyle::new().desc("copying"));
/// for _ in 0..100 {
///     bar.tick()?;
/// }
/// bar.close()?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct ProgressBar {
    state: BarState,
    /// High-water mark of the rendered length, for shrink padding.
    max_rendered: usize,
}

impl ProgressBar {
    /// Create a bar expecting `total` updates. A zero total renders the
    /// indefinite four-phase animation instead of a percentage.
    pub fn new(total: u64) -> Self {
        Self::with_style(total, BarStyle::default())
    }

    /// Create a bar with an explicit style.
    pub fn with_style(total: u64, style: BarStyle) -> Self {
        Self {
            state: BarState::new(total, style),
            max_rendered: 0,
        }
    }

    /// Advance the count by `amount` and repaint.
    pub fn update(&mut self, amount: u64) -> io::Result<()> {
        self.state.count += amount;
        self.write(false)
    }

    /// Advance the count by one and repaint.
    pub fn tick(&mut self) -> io::Result<()> {
        self.update(1)
    }

    /// Override the displayed fraction directly and repaint.
    ///
    /// Useful when progress is computed elsewhere; the update count no
    /// longer drives the bar once set.
    pub fn set_fraction(&mut self, fraction: f64) -> io::Result<()> {
        self.state.fraction_override = Some(fraction);
        self.write(false)
    }

    /// Pin the bar to its final state and terminate the line.
    pub fn close(&mut self) -> io::Result<()> {
        self.state.finish();
        self.write(true)
    }

    /// Number of updates received so far.
    pub fn count(&self) -> u64 {
        self.state.count
    }

    /// The total this bar was created with.
    pub fn total(&self) -> u64 {
        self.state.total
    }

    /// Wrap an iterator, ticking once per consumed item and closing the
    /// bar when the iterator is exhausted.
    pub fn wrap_iter<I>(iter: I, style: BarStyle) -> ProgressIter<I::IntoIter>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = iter.into_iter();
        ProgressIter {
            bar: Self::with_style(iter.len() as u64, style),
            iter,
            pending: false,
            closed: false,
        }
    }

    fn rendered_at(&mut self, elapsed: Duration) -> String {
        let mut rendered = self.state.format_at(elapsed);
        let length = rendered.chars().count();
        if length < self.max_rendered {
            rendered.extend(std::iter::repeat(' ').take(self.max_rendered - length));
        } else {
            self.max_rendered = length;
        }
        rendered
    }

    fn write(&mut self, end_line: bool) -> io::Result<()> {
        let rendered = self.rendered_at(self.state.started.elapsed());
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if end_line {
            writeln!(out, "{rendered}")?;
        } else {
            write!(out, "{rendered}\r")?;
        }
        out.flush()
    }
}

/// Iterator adapter produced by [`ProgressBar::wrap_iter`].
///
/// The bar advances when the *next* item is requested, i.e. after the
/// consumer finished processing the previous one, and closes itself on
/// exhaustion. Render failures are ignored; an iterator is no place to
/// surface them.
#[derive(Debug)]
pub struct ProgressIter<I> {
    iter: I,
    bar: ProgressBar,
    pending: bool,
    closed: bool,
}

impl<I: Iterator> Iterator for ProgressIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.pending {
            let _ = self.bar.tick();
            self.pending = false;
        }
        match self.iter.next() {
            Some(item) => {
                self.pending = true;
                Some(item)
            }
            None => {
                if !self.closed {
                    let _ = self.bar.close();
                    self.closed = true;
                }
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_accumulates() {
        let mut bar = ProgressBar::new(20);
        // Drive the state directly; write() would hit stdout.
        for _ in 0..10 {
            bar.state.count += 1;
        }
        assert_eq!(bar.count(), 10);
        let (fraction, dummy) = bar.state.fraction();
        assert!(!dummy);
        assert_eq!(fraction, 0.5);
    }

    #[test]
    fn test_close_pins_count_to_total() {
        let mut bar = ProgressBar::new(20);
        bar.state.count = 7;
        bar.state.finish();
        assert_eq!(bar.count(), 20);
    }

    #[test]
    fn test_padding_high_water_is_monotonic() {
        let style = BarStyle::new().bar_width(4);
        let mut bar = ProgressBar::with_style(100, style);

        bar.state.count = 1;
        // Large remaining estimate makes a long line early on.
        let first = bar.rendered_at(Duration::from_secs(90));
        bar.state.count = 99;
        // Near the end the remaining field shrinks; padding keeps the
        // overall width.
        let second = bar.rendered_at(Duration::from_secs(100));
        assert_eq!(first.chars().count(), second.chars().count());
        assert!(second.ends_with(' '));
    }

    #[test]
    fn test_wrap_iter_yields_everything() {
        let items: Vec<u32> = ProgressBar::wrap_iter(0..5u32, BarStyle::new().hide_time()).collect();
        assert_eq!(items, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_wrap_iter_total_from_len() {
        let wrapped = ProgressBar::wrap_iter(vec!["a", "b", "c"], BarStyle::new());
        assert_eq!(wrapped.bar.total(), 3);
    }
}
