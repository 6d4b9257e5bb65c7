//! termblock - concurrent multi-region terminal status rendering.
//!
//! This library manages a stack of independently updatable multi-line
//! regions ("blocks") on an ANSI terminal. Blocks can be created, updated
//! and retired from any number of threads; the shared [`printer::Printer`]
//! registry linearizes every repaint so concurrent writers never corrupt
//! the screen. On top of the block layer sit two progress-bar flavours
//! plus a handful of helpers (human-readable formatters, an LRU cache,
//! a directory-tree renderer and an HTTP fetcher) that feed it content.
//!
//! # Quick start
//!
//! ```no_run
//! use termblock::{BlockConfig, PrinterError};
//!
//! fn main() -> Result<(), PrinterError> {
//!     let mut status = BlockConfig::new().open()?;
//!     for step in 0..10 {
//!         status.print(&format!("working...\n\tstep {step}"))?;
//!     }
//!     status.exit() // flush the final content into scrollback
//! }
//! ```
//!
//! Note: the terminal must support ANSI escape sequences. No capability
//! negotiation is performed.

pub mod cache;
pub mod fetch;
pub mod fmt;
pub mod printer;
pub mod progress;
pub mod tree;
pub mod wrap;

pub use printer::{Block, BlockConfig, Printer, PrinterError};
pub use progress::{BarStyle, BlockBar, ProgressBar};
pub use wrap::WrapMode;

/// Version of the termblock library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
