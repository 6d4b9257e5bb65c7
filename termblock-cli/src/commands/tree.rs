//! Tree command - print a directory tree.

use std::io::{self, Write};
use std::path::PathBuf;

use termblock::tree::{write_tree, TreeConfig, DEFAULT_MAX_DEPTH};

use crate::error::CliError;

/// Arguments for the tree command.
#[derive(clap::Args)]
pub struct TreeArgs {
    /// Directory to render
    pub path: PathBuf,

    /// List the files inside each directory
    #[arg(short = 'f', long)]
    pub files: bool,

    /// Use ASCII glyphs instead of Unicode pipes
    #[arg(long)]
    pub ascii: bool,

    /// Maximum directory depth to descend into
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

/// Run the tree command.
pub fn run(args: TreeArgs) -> Result<(), CliError> {
    let config = TreeConfig {
        show_files: args.files,
        max_depth: args.max_depth,
        ascii_glyphs: args.ascii,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_tree(&args.path, &mut out, &config).map_err(|error| CliError::Tree {
        path: args.path.clone(),
        error,
    })?;
    out.flush().map_err(|error| CliError::Tree {
        path: args.path,
        error,
    })
}
