//! termblock CLI - command-line interface
//!
//! This binary exposes the termblock library through a handful of
//! subcommands: a directory-tree printer, an HTTP fetcher with live
//! progress, and a demo that exercises concurrent block rendering.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

#[derive(Parser)]
#[command(name = "termblock")]
#[command(about = "Terminal block rendering toolkit", version = termblock::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug-level logging regardless of RUST_LOG
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print a tree view of a directory
    Tree(commands::tree::TreeArgs),
    /// Download a file over HTTP with live progress
    Fetch(commands::fetch::FetchArgs),
    /// Drive several concurrent progress bars and status blocks
    Demo(commands::demo::DemoArgs),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match cli.command {
        Command::Tree(args) => commands::tree::run(args),
        Command::Fetch(args) => commands::fetch::run(args),
        Command::Demo(args) => commands::demo::run(args),
    };

    if let Err(error) = result {
        error.exit();
    }
}

/// Log to stderr so log lines never fight the managed block region on
/// stdout. Defaults to warnings unless RUST_LOG or --debug says more.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
