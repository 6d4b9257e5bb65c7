//! Block-hosted progress bar.

use std::sync::Arc;

use super::{BarState, BarStyle};
use crate::printer::{Block, BlockConfig, Printer, PrinterError};

/// A progress bar rendered through an owned [`Block`].
///
/// Because the block layer repaints with erase-current-line sequences,
/// no shrink padding is needed, and any number of `BlockBar`s can run
/// concurrently alongside other blocks. The description may span
/// multiple lines; overflow wraps within the block.
///
/// Closing the bar flushes the final render into scrollback and retires
/// the block.
#[derive(Debug)]
pub struct BlockBar {
    state: BarState,
    block: Block,
}

impl BlockBar {
    /// Create a bar on the process-wide printer with the default style.
    pub fn new(total: u64) -> Result<Self, PrinterError> {
        Self::with_style(total, BarStyle::default())
    }

    /// Create a bar on the process-wide printer.
    pub fn with_style(total: u64, style: BarStyle) -> Result<Self, PrinterError> {
        Self::with_style_in(&Printer::global(), total, style)
    }

    /// Create a bar on a specific printer.
    ///
    /// The owned block's wrap width follows the style's `max_width`
    /// when one is configured.
    pub fn with_style_in(
        printer: &Arc<Printer>,
        total: u64,
        style: BarStyle,
    ) -> Result<Self, PrinterError> {
        let mut config = BlockConfig::new();
        if let Some(width) = style.max_width {
            config = config.width(width);
        }
        let block = config.open_in(printer)?;
        Ok(Self {
            state: BarState::new(total, style),
            block,
        })
    }

    /// Advance the count by `amount` and repaint through the block.
    pub fn update(&mut self, amount: u64) -> Result<(), PrinterError> {
        self.state.count += amount;
        self.render()
    }

    /// Advance the count by one and repaint through the block.
    pub fn tick(&mut self) -> Result<(), PrinterError> {
        self.update(1)
    }

    /// Override the displayed fraction directly and repaint.
    pub fn set_fraction(&mut self, fraction: f64) -> Result<(), PrinterError> {
        self.state.fraction_override = Some(fraction);
        self.render()
    }

    /// Pin the bar to its final state, show it once more, and retire
    /// the owned block (flushing the final render into scrollback).
    pub fn close(&mut self) -> Result<(), PrinterError> {
        self.state.finish();
        self.render()?;
        self.block.exit()
    }

    /// Number of updates received so far.
    pub fn count(&self) -> u64 {
        self.state.count
    }

    /// The total this bar was created with.
    pub fn total(&self) -> u64 {
        self.state.total
    }

    fn render(&mut self) -> Result<(), PrinterError> {
        let rendered = self.state.format_at(self.state.started.elapsed());
        self.block.print(&rendered)
    }
}
