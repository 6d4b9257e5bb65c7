//! Block handles and their configuration.

use std::sync::Arc;

use super::registry::{BlockId, Printer};
use super::PrinterError;
use crate::wrap::{wrap, WrapMode};

/// Default wrap width for new blocks, in columns.
pub const DEFAULT_WIDTH: usize = 120;

/// Configuration for opening a [`Block`].
///
/// ```no_run
/// use termblock::{BlockConfig, WrapMode};
///
/// let block = BlockConfig::new()
///     .content("starting up")
///     .width(80)
///     .mode(WrapMode::Cut)
///     .open()?;
/// # Ok::<(), termblock::PrinterError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockConfig {
    content: Option<String>,
    silent: bool,
    width: Option<usize>,
    mode: WrapMode,
}

impl BlockConfig {
    /// Start from the defaults: no initial content, not silent,
    /// 120-column split wrapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial content for the block.
    pub fn content(mut self, text: impl Into<String>) -> Self {
        self.content = Some(text.into());
        self
    }

    /// Open the block silent: exiting it never prints its content, and
    /// discarding it keeps its rows reserved for one more blank-out
    /// repaint.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Wrap width in columns. Zero is rejected at open time.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Wrap mode for overflowing lines.
    pub fn mode(mut self, mode: WrapMode) -> Self {
        self.mode = mode;
        self
    }

    /// Open the block on the process-wide [`Printer::global`] registry.
    ///
    /// # Errors
    ///
    /// [`PrinterError::InvalidWidth`] if the configured width is zero.
    pub fn open(self) -> Result<Block, PrinterError> {
        self.open_in(&Printer::global())
    }

    /// Open the block on a specific printer.
    pub fn open_in(self, printer: &Arc<Printer>) -> Result<Block, PrinterError> {
        let width = self.width.unwrap_or(DEFAULT_WIDTH);
        if width == 0 {
            return Err(PrinterError::InvalidWidth);
        }
        let lines = match &self.content {
            Some(text) => wrap(text, width, self.mode)?,
            None => Vec::new(),
        };
        let id = printer.register(lines, self.silent);
        Ok(Block {
            printer: Arc::clone(printer),
            id,
            width,
            mode: self.mode,
            silent: self.silent,
            closed: false,
        })
    }
}

/// Handle to one multi-line region of managed terminal output.
///
/// A block appears in its printer's active set from successful creation
/// until [`exit`](Block::exit) or [`discard`](Block::discard), exactly
/// once, at the position determined by creation order. The handle can be
/// moved to any thread; every operation goes through the printer's lock.
///
/// There is no `Drop` teardown: a block whose owner never calls
/// `discard`/`exit` keeps its screen rows reserved for the life of the
/// process.
#[derive(Debug)]
pub struct Block {
    printer: Arc<Printer>,
    id: BlockId,
    width: usize,
    mode: WrapMode,
    silent: bool,
    closed: bool,
}

impl Block {
    /// Replace the block's content without repainting.
    ///
    /// The text is wrapped to the block's width and the line-count
    /// difference is applied to the shared counters. Nothing becomes
    /// visible until the next repaint.
    pub fn update(&mut self, text: &str) -> Result<(), PrinterError> {
        self.ensure_open()?;
        let lines = wrap(text, self.width, self.mode)?;
        self.printer.update_block(self.id, lines);
        Ok(())
    }

    /// Replace the block's content and repaint the whole region.
    ///
    /// This is the only way new content becomes visible.
    pub fn print(&mut self, text: &str) -> Result<(), PrinterError> {
        self.update(text)?;
        self.printer.repaint()?;
        Ok(())
    }

    /// Repaint the whole region without changing this block's content.
    pub fn refresh(&self) -> Result<(), PrinterError> {
        self.ensure_open()?;
        self.printer.repaint()?;
        Ok(())
    }

    /// Write the block's current lines straight to the terminal,
    /// committing a snapshot to scrollback. The shared counters are
    /// untouched and no repaint happens.
    pub fn flush(&self) -> Result<(), PrinterError> {
        self.ensure_open()?;
        self.printer.flush_block(self.id)?;
        Ok(())
    }

    /// Remove the block without printing anything.
    ///
    /// For a non-silent block the region's high-water mark shrinks with
    /// it; a silent block keeps its rows reserved so the next repaint
    /// blanks them.
    pub fn discard(&mut self) -> Result<(), PrinterError> {
        self.ensure_open()?;
        self.printer.unregister(self.id);
        self.closed = true;
        Ok(())
    }

    /// Retire the block.
    ///
    /// Non-silent blocks are flushed into scrollback and then removed.
    /// Silent blocks are removed and one repaint is forced immediately,
    /// blanking the rows they occupied; their content is never printed.
    pub fn exit(&mut self) -> Result<(), PrinterError> {
        self.ensure_open()?;
        if self.silent {
            self.printer.unregister(self.id);
            self.closed = true;
            self.printer.repaint()?;
        } else {
            self.printer.flush_block(self.id)?;
            self.printer.unregister(self.id);
            self.closed = true;
        }
        Ok(())
    }

    /// Number of display lines the block currently occupies.
    pub fn line_count(&self) -> usize {
        self.printer.block_len(self.id)
    }

    /// Whether the block was discarded or exited.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the block was created silent.
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// The block's wrap width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    fn ensure_open(&self) -> Result<(), PrinterError> {
        if self.closed {
            Err(PrinterError::Closed)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::Mutex;

    struct NullSink;

    impl Write for NullSink {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn test_printer() -> Arc<Printer> {
        Printer::with_sink(Box::new(NullSink))
    }

    #[test]
    fn test_open_with_content_counts_lines() {
        let printer = test_printer();
        let block = BlockConfig::new()
            .content("a\nb\nc")
            .open_in(&printer)
            .unwrap();

        assert_eq!(block.line_count(), 3);
        assert_eq!(printer.lines_used(), 3);
        assert_eq!(printer.lines_total(), 3);
    }

    #[test]
    fn test_open_without_content_is_zero_lines() {
        let printer = test_printer();
        let block = BlockConfig::new().open_in(&printer).unwrap();

        assert_eq!(block.line_count(), 0);
        assert_eq!(printer.lines_used(), 0);
    }

    #[test]
    fn test_open_zero_width_fails() {
        let printer = test_printer();
        let result = BlockConfig::new().width(0).open_in(&printer);
        assert!(matches!(result, Err(PrinterError::InvalidWidth)));
        // Construction aborted; nothing was registered.
        assert_eq!(printer.block_count(), 0);
    }

    #[test]
    fn test_update_wraps_to_width() {
        let printer = test_printer();
        let mut block = BlockConfig::new().width(4).open_in(&printer).unwrap();

        block.update("123456789").unwrap();
        assert_eq!(block.line_count(), 3);

        let mut cut = BlockConfig::new()
            .width(4)
            .mode(WrapMode::Cut)
            .open_in(&printer)
            .unwrap();
        cut.update("123456789").unwrap();
        assert_eq!(cut.line_count(), 1);
    }

    #[test]
    fn test_update_does_not_repaint() {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let printer = Printer::with_sink(Box::new(SharedSink(Arc::clone(&buf))));
        let mut block = BlockConfig::new().open_in(&printer).unwrap();

        block.update("invisible").unwrap();
        assert!(buf.lock().unwrap().is_empty());

        block.print("visible").unwrap();
        assert!(!buf.lock().unwrap().is_empty());
    }

    #[test]
    fn test_closed_block_rejects_operations() {
        let printer = test_printer();
        let mut block = BlockConfig::new().content("x").open_in(&printer).unwrap();
        block.exit().unwrap();

        assert!(block.is_closed());
        assert!(matches!(block.update("y"), Err(PrinterError::Closed)));
        assert!(matches!(block.print("y"), Err(PrinterError::Closed)));
        assert!(matches!(block.refresh(), Err(PrinterError::Closed)));
        assert!(matches!(block.flush(), Err(PrinterError::Closed)));
        assert!(matches!(block.discard(), Err(PrinterError::Closed)));
        assert!(matches!(block.exit(), Err(PrinterError::Closed)));
    }

    #[test]
    fn test_silent_exit_blanks_without_printing() {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let printer = Printer::with_sink(Box::new(SharedSink(Arc::clone(&buf))));

        let mut block = BlockConfig::new()
            .content("secret")
            .silent(true)
            .open_in(&printer)
            .unwrap();
        block.exit().unwrap();

        let output = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
        // The forced repaint blanks the vacated row; the content itself
        // is never written.
        assert!(!output.contains("secret"));
        assert_eq!(output, "\x1b[2K\r\n\x1b[1A\r");
        assert_eq!(printer.lines_used(), 0);
        assert_eq!(printer.lines_total(), 1);
    }

    #[test]
    fn test_non_silent_exit_flushes_content() {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let printer = Printer::with_sink(Box::new(SharedSink(Arc::clone(&buf))));

        let mut block = BlockConfig::new()
            .content("done: 42")
            .open_in(&printer)
            .unwrap();
        block.exit().unwrap();

        let output = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
        assert_eq!(output, "\x1b[2K\rdone: 42\n");
        assert_eq!(printer.lines_used(), 0);
        assert_eq!(printer.lines_total(), 0);
    }
}
