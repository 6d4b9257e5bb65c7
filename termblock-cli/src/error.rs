//! CLI error handling with user-friendly messages.

use std::fmt;
use std::path::PathBuf;
use std::process;

use termblock::fetch::FetchError;
use termblock::PrinterError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Rendering a directory tree failed
    Tree { path: PathBuf, error: std::io::Error },
    /// A download failed
    Fetch(FetchError),
    /// The async runtime could not be built
    Runtime(std::io::Error),
    /// Terminal rendering failed
    Render(PrinterError),
    /// A worker thread panicked
    WorkerPanic,
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {self}");

        if let CliError::Fetch(FetchError::Http(_)) = self {
            eprintln!();
            eprintln!("Check that the URL is reachable and the server is up.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Tree { path, error } => {
                write!(f, "Failed to render tree for '{}': {}", path.display(), error)
            }
            CliError::Fetch(e) => write!(f, "Download failed: {e}"),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {e}"),
            CliError::Render(e) => write!(f, "Terminal rendering failed: {e}"),
            CliError::WorkerPanic => write!(f, "A worker thread panicked"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Tree { error, .. } => Some(error),
            CliError::Fetch(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::WorkerPanic => None,
        }
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}

impl From<PrinterError> for CliError {
    fn from(e: PrinterError) -> Self {
        CliError::Render(e)
    }
}
