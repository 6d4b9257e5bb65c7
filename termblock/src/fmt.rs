//! Human-readable value formatters.
//!
//! Small, allocation-light helpers shared by the progress bars and the
//! HTTP fetcher.

use std::time::Duration;

/// Format a second count as `MM:SS`, switching to `HH:MM:SS` once the
/// value reaches one hour. Fractional seconds are truncated; negative
/// inputs clamp to zero.
pub fn format_seconds(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hours == 0 {
        format!("{mins:02}:{secs:02}")
    } else {
        format!("{hours:02}:{mins:02}:{secs:02}")
    }
}

/// Format a byte count using binary units.
///
/// The smallest unit is KiB, so small counts come out fractional
/// (`"0.49 KiB"`), matching the fixed-precision columns the progress
/// display lines up.
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let kib = bytes as f64 / KIB;
    if kib >= KIB * KIB {
        format!("{:.2} GiB", kib / (KIB * KIB))
    } else if kib >= KIB {
        format!("{:.2} MiB", kib / KIB)
    } else {
        format!("{kib:.2} KiB")
    }
}

/// Format an average transfer rate as `<size>/s`.
///
/// With a zero elapsed time the raw byte count is used as the rate.
pub fn format_speed(bytes: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        bytes as f64 / secs
    } else {
        bytes as f64
    };
    format!("{}/s", format_size(rate as u64))
}
