//! Multi-threaded multi-region stdout printer.
//!
//! A [`Block`] is a handle to one independently updatable multi-line
//! region of terminal output. All blocks registered with the same
//! [`Printer`] share a contiguous patch of screen rows and are rendered
//! in the order of their creation, regardless of which thread updates
//! which block.
//!
//! # Architecture
//!
//! ```text
//! worker threads                Printer (registry)            terminal
//!      │                             │                           │
//!      │ block.update("...")         │                           │
//!      ├────────────────────────────►│ wrap + adjust counters    │
//!      │                             │                           │
//!      │ block.print("...")          │                           │
//!      ├────────────────────────────►│ repaint all blocks        │
//!      │                             ├──────────────────────────►│
//!      │ block.exit()                │                           │
//!      ├────────────────────────────►│ flush + unregister        │
//!      │                             ├──────────────────────────►│
//! ```
//!
//! Every state transition and every terminal write happens inside the
//! printer's single lock, so concurrent `print`/`exit` calls from
//! different threads are linearized into a sequence of complete
//! repaints. Note: the terminal must support ANSI escape sequences.

mod block;
mod registry;

pub use block::{Block, BlockConfig};
pub use registry::Printer;

use thiserror::Error;

/// Erase the current line and return to column 0.
pub(crate) const ANSI_ERASE_LINE: &str = "\x1b[2K\r";

/// Move the cursor up `n` rows and return to column 0.
pub(crate) fn ansi_cursor_up(n: usize) -> String {
    format!("\x1b[{n}A\r")
}

/// Errors raised by the printer core.
///
/// These are contract errors, not operational ones: invalid construction
/// parameters surface at construction time and are never retried, while
/// operating on a closed block is a programmer error surfaced
/// immediately. A failing terminal write is propagated uninterpreted.
#[derive(Debug, Error)]
pub enum PrinterError {
    /// Wrap width must be at least one column
    #[error("wrap width must be at least one column")]
    InvalidWidth,

    /// The block was already discarded or exited
    #[error("block is closed")]
    Closed,

    /// Writing to the terminal failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
