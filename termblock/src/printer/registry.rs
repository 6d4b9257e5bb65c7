//! Process-wide block registry and repaint routine.
//!
//! The [`Printer`] owns the ordered set of active blocks, the two height
//! counters and the output sink. It is an explicit service object: the
//! process-wide instance from [`Printer::global`] renders to stdout,
//! while tests construct their own instance over an in-memory sink via
//! [`Printer::with_sink`].
//!
//! # Height accounting
//!
//! Two counters drive the repaint:
//!
//! - `lines_used` - the sum of all active blocks' current line counts.
//! - `lines_total` - the high-water mark of `lines_used`. It decreases
//!   only when a non-silent block is removed, by that block's line
//!   count. A silent removal leaves it unchanged so the next repaint
//!   still blanks the vacated rows instead of leaving stale artifacts
//!   behind.
//!
//! Invariant: `lines_total >= lines_used` at all times.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use super::{ansi_cursor_up, ANSI_ERASE_LINE};

/// Identifier of a registered block.
///
/// Ids are handed out from a monotonically increasing counter, so the
/// ascending id order of the active map *is* creation order.
pub(crate) type BlockId = u64;

/// Registry-side state of one active block.
struct BlockSlot {
    /// Current display lines, already wrapped.
    lines: Vec<String>,
    /// Whether removal retains `lines_total` (see module docs).
    silent: bool,
}

/// Everything the printer guards: the active blocks, both counters and
/// the sink. Keeping the sink inside the same lock means a repaint is a
/// single critical section and output from concurrent callers can never
/// interleave.
struct PrinterState {
    blocks: BTreeMap<BlockId, BlockSlot>,
    next_id: BlockId,
    lines_used: usize,
    lines_total: usize,
    sink: Box<dyn Write + Send>,
}

/// Shared registry for a set of [`Block`](super::Block)s.
///
/// All operations take `&self`; the single internal lock linearizes
/// them. The lock is never held across another printer call, so no
/// re-entrancy is required: compound operations such as a silent exit
/// run their state mutation and the follow-up repaint as two sequenced
/// critical sections.
pub struct Printer {
    state: Mutex<PrinterState>,
}

impl Printer {
    /// Create a printer rendering to stdout.
    pub fn new() -> Arc<Self> {
        Self::with_sink(Box::new(io::stdout()))
    }

    /// Create a printer rendering to an arbitrary sink.
    ///
    /// Used by tests to capture the exact bytes a repaint emits.
    pub fn with_sink(sink: Box<dyn Write + Send>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(PrinterState {
                blocks: BTreeMap::new(),
                next_id: 0,
                lines_used: 0,
                lines_total: 0,
                sink,
            }),
        })
    }

    /// The process-wide default printer, rendering to stdout.
    ///
    /// Blocks opened without an explicit printer register here.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<Printer>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(Printer::new))
    }

    /// Sum of all active blocks' current line counts.
    pub fn lines_used(&self) -> usize {
        self.state.lock().unwrap().lines_used
    }

    /// High-water mark of the managed region, in rows.
    pub fn lines_total(&self) -> usize {
        self.state.lock().unwrap().lines_total
    }

    /// Number of currently active blocks.
    pub fn block_count(&self) -> usize {
        self.state.lock().unwrap().blocks.len()
    }

    /// Repaint the whole managed region.
    ///
    /// For every active block, in creation order, emits an
    /// erase-current-line sequence followed by the line text and a line
    /// terminator, for each of its lines. Rows vacated by shrunken or
    /// removed blocks (`lines_total - lines_used` of them) are blanked
    /// with erase+terminate pairs. Finally the cursor moves back up by
    /// `lines_total` rows to the top-left of the region, so the next
    /// repaint overwrites exactly the same rows.
    ///
    /// The frame is composed off-screen and written with a single call,
    /// all inside the lock.
    pub fn repaint(&self) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();

        let mut frame = String::new();
        for slot in state.blocks.values() {
            for line in &slot.lines {
                frame.push_str(ANSI_ERASE_LINE);
                frame.push_str(line);
                frame.push('\n');
            }
        }
        for _ in 0..(state.lines_total - state.lines_used) {
            frame.push_str(ANSI_ERASE_LINE);
            frame.push('\n');
        }
        frame.push_str(&ansi_cursor_up(state.lines_total));

        state.sink.write_all(frame.as_bytes())?;
        state.sink.flush()
    }

    /// Insert a new block at the tail of the creation order.
    pub(crate) fn register(&self, lines: Vec<String>, silent: bool) -> BlockId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        state.lines_used += lines.len();
        state.lines_total = state.lines_total.max(state.lines_used);
        state.blocks.insert(id, BlockSlot { lines, silent });
        id
    }

    /// Replace a block's lines, applying the line-count difference to
    /// the counters. Does not repaint.
    pub(crate) fn update_block(&self, id: BlockId, lines: Vec<String>) {
        let mut state = self.state.lock().unwrap();
        let new_count = lines.len();
        let old_count = match state.blocks.get_mut(&id) {
            Some(slot) => {
                let old = slot.lines.len();
                slot.lines = lines;
                old
            }
            None => return,
        };
        state.lines_used = state.lines_used - old_count + new_count;
        state.lines_total = state.lines_total.max(state.lines_used);
    }

    /// Remove a block from the active set.
    ///
    /// `lines_used` always drops by the block's line count;
    /// `lines_total` only does so for non-silent blocks.
    pub(crate) fn unregister(&self, id: BlockId) {
        let mut state = self.state.lock().unwrap();
        if let Some(slot) = state.blocks.remove(&id) {
            state.lines_used -= slot.lines.len();
            if !slot.silent {
                state.lines_total -= slot.lines.len();
            }
        }
    }

    /// Write a block's current lines straight to the sink, committing a
    /// snapshot to scrollback. Counters are untouched and no repaint
    /// happens.
    pub(crate) fn flush_block(&self, id: BlockId) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        let out = {
            let Some(slot) = state.blocks.get(&id) else {
                return Ok(());
            };
            let mut out = String::new();
            for line in &slot.lines {
                out.push_str(ANSI_ERASE_LINE);
                out.push_str(line);
                out.push('\n');
            }
            out
        };
        state.sink.write_all(out.as_bytes())?;
        state.sink.flush()
    }

    /// Current line count of a block, or zero once it is gone.
    pub(crate) fn block_len(&self, id: BlockId) -> usize {
        let state = self.state.lock().unwrap();
        state.blocks.get(&id).map_or(0, |slot| slot.lines.len())
    }
}

impl std::fmt::Debug for Printer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("Printer")
            .field("blocks", &state.blocks.len())
            .field("lines_used", &state.lines_used)
            .field("lines_total", &state.lines_total)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::BlockConfig;

    /// Sink that appends everything into a shared buffer.
    #[derive(Clone)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self(Arc::clone(&buf)), buf)
        }
    }

    impl Write for SharedSink {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured(buf: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buf.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_register_updates_counters() {
        let (sink, _) = SharedSink::new();
        let printer = Printer::with_sink(Box::new(sink));

        printer.register(vec!["a".into()], false);
        printer.register(vec!["b".into(), "c".into()], false);

        assert_eq!(printer.lines_used(), 3);
        assert_eq!(printer.lines_total(), 3);
        assert_eq!(printer.block_count(), 2);
    }

    #[test]
    fn test_update_block_applies_diff() {
        let (sink, _) = SharedSink::new();
        let printer = Printer::with_sink(Box::new(sink));

        let id = printer.register(vec!["a".into(), "b".into(), "c".into()], false);
        assert_eq!(printer.lines_used(), 3);

        printer.update_block(id, vec!["a".into()]);
        assert_eq!(printer.lines_used(), 1);
        // High-water mark is retained after a shrink.
        assert_eq!(printer.lines_total(), 3);

        printer.update_block(id, vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        assert_eq!(printer.lines_used(), 4);
        assert_eq!(printer.lines_total(), 4);
    }

    #[test]
    fn test_unregister_non_silent_shrinks_total() {
        let (sink, _) = SharedSink::new();
        let printer = Printer::with_sink(Box::new(sink));

        let a = printer.register(vec!["a".into()], false);
        let b = printer.register(vec!["b".into(), "c".into()], false);
        printer.register(vec!["d".into()], false);
        assert_eq!(printer.lines_used(), 4);
        assert_eq!(printer.lines_total(), 4);

        printer.unregister(b);
        assert_eq!(printer.lines_used(), 2);
        assert_eq!(printer.lines_total(), 2);

        printer.unregister(a);
        assert_eq!(printer.lines_used(), 1);
        assert_eq!(printer.lines_total(), 1);
    }

    #[test]
    fn test_unregister_silent_retains_total() {
        let (sink, _) = SharedSink::new();
        let printer = Printer::with_sink(Box::new(sink));

        printer.register(vec!["a".into()], false);
        let b = printer.register(vec!["b".into(), "c".into()], true);
        printer.register(vec!["d".into()], false);

        printer.unregister(b);
        assert_eq!(printer.lines_used(), 2);
        assert_eq!(printer.lines_total(), 4);
    }

    #[test]
    fn test_repaint_frame_bytes() {
        let (sink, buf) = SharedSink::new();
        let printer = Printer::with_sink(Box::new(sink));

        printer.register(vec!["a".into()], false);
        printer.register(vec!["b".into(), "c".into()], false);
        printer.repaint().unwrap();

        assert_eq!(
            captured(&buf),
            "\x1b[2K\ra\n\x1b[2K\rb\n\x1b[2K\rc\n\x1b[3A\r"
        );
    }

    #[test]
    fn test_repaint_blanks_vacated_rows() {
        let (sink, buf) = SharedSink::new();
        let printer = Printer::with_sink(Box::new(sink));

        let id = printer.register(vec!["a".into(), "b".into(), "c".into()], false);
        printer.update_block(id, vec!["a".into()]);
        printer.repaint().unwrap();

        // One content row plus two blanked rows, cursor back up by three.
        assert_eq!(
            captured(&buf),
            "\x1b[2K\ra\n\x1b[2K\r\n\x1b[2K\r\n\x1b[3A\r"
        );
    }

    #[test]
    fn test_repaint_renders_in_creation_order() {
        let (sink, buf) = SharedSink::new();
        let printer = Printer::with_sink(Box::new(sink));

        let a = printer.register(vec![String::new()], false);
        let b = printer.register(vec![String::new()], false);
        let c = printer.register(vec![String::new()], false);

        // Update in an order unrelated to creation.
        printer.update_block(c, vec!["third".into()]);
        printer.update_block(a, vec!["first".into()]);
        printer.update_block(b, vec!["second".into()]);
        printer.repaint().unwrap();

        let frame = captured(&buf);
        let first = frame.find("first").unwrap();
        let second = frame.find("second").unwrap();
        let third = frame.find("third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_flush_block_writes_only_that_block() {
        let (sink, buf) = SharedSink::new();
        let printer = Printer::with_sink(Box::new(sink));

        printer.register(vec!["other".into()], false);
        let id = printer.register(vec!["one".into(), "two".into()], false);

        printer.flush_block(id).unwrap();
        assert_eq!(captured(&buf), "\x1b[2K\rone\n\x1b[2K\rtwo\n");
        // Counters untouched.
        assert_eq!(printer.lines_used(), 3);
        assert_eq!(printer.lines_total(), 3);
    }

    #[test]
    fn test_total_never_below_used() {
        let (sink, _) = SharedSink::new();
        let printer = Printer::with_sink(Box::new(sink));

        let mut ids = Vec::new();
        for i in 0..10 {
            let lines = vec!["line".to_string(); i % 4 + 1];
            ids.push(printer.register(lines, i % 3 == 0));
            assert!(printer.lines_total() >= printer.lines_used());
        }
        for id in ids {
            printer.update_block(id, vec!["x".into()]);
            assert!(printer.lines_total() >= printer.lines_used());
            printer.unregister(id);
            assert!(printer.lines_total() >= printer.lines_used());
        }
        assert_eq!(printer.lines_used(), 0);
    }

    #[test]
    fn test_blocks_share_one_region() {
        let (sink, buf) = SharedSink::new();
        let printer = Printer::with_sink(Box::new(sink));

        let mut a = BlockConfig::new().content("alpha").open_in(&printer).unwrap();
        let mut b = BlockConfig::new().content("beta").open_in(&printer).unwrap();

        b.print("beta 2").unwrap();
        let frame = captured(&buf);
        assert!(frame.contains("alpha"));
        assert!(frame.contains("beta 2"));
        assert!(frame.ends_with("\x1b[2A\r"));

        a.discard().unwrap();
        b.discard().unwrap();
        assert_eq!(printer.lines_used(), 0);
    }
}
