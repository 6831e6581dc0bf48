//! Progress bar styling for transfers.
//!
//! One bar per transfer: transfers are strictly sequential, so there is no
//! multi-bar coordination to manage. When the total size is known from the
//! response the bar shows bytes, rate, and ETA; otherwise it degrades to a
//! byte-counting spinner. Quiet mode hides the bar entirely.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Template when the total size is known.
pub const TEMPLATE_BAR_WITH_SIZE: &str =
    "{bar:40.cyan/blue} {bytes:>10}/{total_bytes:10} ({bytes_per_sec:>12}, eta {eta}) {wide_msg}";

/// Template when only the running byte count is known.
pub const TEMPLATE_SPINNER: &str =
    "{spinner:.cyan} {bytes:>10} ({bytes_per_sec:>12}) {wide_msg}";

/// Fine-grained progress characters.
pub const CHARS_FINE: &str = "█▉▊▋▌▍▎▏  ";

/// Creates the progress bar for one transfer.
///
/// `total` is the expected final size of the destination file (resume offset
/// included) and `position` the number of bytes already on disk.
pub fn transfer_bar(quiet: bool, total: Option<u64>, position: u64) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    match total {
        Some(total) => {
            let style = ProgressStyle::with_template(TEMPLATE_BAR_WITH_SIZE)
                .map(|style| style.progress_chars(CHARS_FINE))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            let bar = ProgressBar::new(total).with_style(style);
            bar.set_position(position);
            bar
        }
        None => {
            let style = ProgressStyle::with_template(TEMPLATE_SPINNER)
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let bar = ProgressBar::new_spinner().with_style(style);
            bar.enable_steady_tick(Duration::from_millis(120));
            bar.set_position(position);
            bar
        }
    }
}
