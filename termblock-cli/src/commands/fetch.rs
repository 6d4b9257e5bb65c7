//! Fetch command - download a file with block-hosted progress.

use std::path::PathBuf;

use termblock::fetch::{download, FetchConfig};

use crate::error::CliError;

/// Arguments for the fetch command.
#[derive(clap::Args)]
pub struct FetchArgs {
    /// URL to download
    pub url: String,

    /// Directory to save into
    #[arg(short = 'o', long, default_value = ".")]
    pub dir: PathBuf,

    /// File name override (derived from the URL by default)
    #[arg(long)]
    pub name: Option<String>,

    /// Connection count for ranged downloads
    #[arg(short = 'c', long, default_value_t = 5)]
    pub connections: usize,

    /// Disable the progress bar
    #[arg(long)]
    pub quiet: bool,
}

/// Run the fetch command.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let config = FetchConfig {
        dir: args.dir,
        file_name: args.name,
        connections: args.connections,
        progress: !args.quiet,
    };

    let path = runtime.block_on(download(&args.url, &config))?;
    println!("saved {}", path.display());
    Ok(())
}
