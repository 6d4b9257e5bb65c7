//! Demo command - concurrent progress bars and status blocks.
//!
//! Spawns one thread per bar plus a silent multi-line status block, all
//! repainting through the shared printer. Useful for eyeballing that
//! concurrent updates never corrupt the display.

use std::thread;
use std::time::Duration;

use termblock::{BarStyle, BlockBar, BlockConfig, PrinterError};

use crate::error::CliError;

/// Arguments for the demo command.
#[derive(clap::Args)]
pub struct DemoArgs {
    /// Number of concurrent progress bars
    #[arg(long, default_value_t = 4)]
    pub bars: usize,

    /// Updates each bar receives before finishing
    #[arg(long, default_value_t = 40)]
    pub steps: u64,
}

/// Run the demo command.
pub fn run(args: DemoArgs) -> Result<(), CliError> {
    let steps = args.steps;
    let mut handles = Vec::new();

    for i in 0..args.bars {
        handles.push(thread::spawn(move || -> Result<(), PrinterError> {
            let style = BarStyle::new()
                .desc(format!("worker {i}"))
                .max_width(100);
            let mut bar = BlockBar::with_style(steps, style)?;
            // Stagger the workers so the bars visibly drift apart.
            let pause = Duration::from_millis(20 + (i as u64 * 13) % 40);
            for _ in 0..steps {
                thread::sleep(pause);
                bar.tick()?;
            }
            bar.close()
        }));
    }

    let bars = args.bars;
    handles.push(thread::spawn(move || -> Result<(), PrinterError> {
        let mut status = BlockConfig::new().silent(true).open()?;
        for elapsed in 0..(steps / 4).max(1) {
            status.print(&format!(
                "demo: {bars} workers running\n\ttick {elapsed}"
            ))?;
            thread::sleep(Duration::from_millis(100));
        }
        status.exit()
    }));

    for handle in handles {
        handle
            .join()
            .map_err(|_| CliError::WorkerPanic)?
            .map_err(CliError::Render)?;
    }
    Ok(())
}
