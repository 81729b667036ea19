//! CLI-specific progress rendering.

use claquete_core::format_duration_seconds;
use indicatif::{ProgressBar, ProgressStyle};

/// Builds the progress bar shown during an encode.
///
/// `ProgressBar` is internally reference-counted, so a clone can be moved
/// into the progress sink while the original stays with the caller for
/// `finish_and_clear`.
pub fn encode_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .expect("progress template is valid"),
    );
    bar
}

/// Formats the `elapsed / total` message shown next to the bar.
pub fn position_message(elapsed_secs: f64, total_secs: f64) -> String {
    format!(
        "{} / {}",
        format_duration_seconds(elapsed_secs),
        format_duration_seconds(total_secs)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_message() {
        assert_eq!(position_message(65.0, 130.0), "00:01:05 / 00:02:10");
    }
}
