//! Parsing of the encoder's machine-readable progress stream.
//!
//! ffmpeg's `-progress pipe:1` mode emits key=value lines on stdout; the one
//! we care about is `out_time_us`, the cumulative encoded time in
//! microseconds. Parsing is stateless per line; turning elapsed time into a
//! completion fraction is the [`ProgressTracker`]'s job so the parser stays
//! reusable for any total-duration context.

/// A single progress marker extracted from the encoder's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    /// Cumulative encoded time in seconds.
    pub elapsed_secs: f64,
}

/// Scans one output line for an elapsed-time marker.
///
/// Lines without a marker, and markers that fail to parse, yield `None`;
/// they are skipped rather than failing the encode.
#[must_use]
pub fn parse_progress_line(line: &str) -> Option<ProgressSample> {
    let value = line.trim().strip_prefix("out_time_us=")?;
    let micros: i64 = value.trim().parse().ok()?;
    if micros < 0 {
        return None;
    }
    Some(ProgressSample {
        elapsed_secs: micros as f64 / 1_000_000.0,
    })
}

/// Turns elapsed-time samples into completion fractions against a known
/// total duration.
///
/// Encoder-reported regressions (a marker lower than a previous one) are
/// clamped to the running maximum, so the fractions handed to the sink are
/// non-decreasing. With a zero or unknown total duration the fraction stays
/// at 0.0 until completion.
#[derive(Debug)]
pub struct ProgressTracker {
    total_secs: f64,
    max_elapsed_secs: f64,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(total_secs: f64) -> Self {
        Self {
            total_secs,
            max_elapsed_secs: 0.0,
        }
    }

    /// Observes a sample and returns `(fraction, elapsed_secs)` after
    /// clamping.
    pub fn observe(&mut self, sample: ProgressSample) -> (f64, f64) {
        if sample.elapsed_secs < self.max_elapsed_secs {
            log::debug!(
                "encoder reported elapsed time regression ({:.3}s < {:.3}s), clamping",
                sample.elapsed_secs,
                self.max_elapsed_secs
            );
        }
        let elapsed = sample.elapsed_secs.max(self.max_elapsed_secs);
        self.max_elapsed_secs = elapsed;

        let fraction = if self.total_secs > 0.0 {
            (elapsed / self.total_secs).min(1.0)
        } else {
            0.0
        };
        (fraction, elapsed)
    }
}
