//! Utility functions for formatting and path handling.

use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration_seconds(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Extracts the filename stem from a path with consistent error handling.
pub fn file_stem(path: &Path) -> CoreResult<String> {
    Ok(path
        .file_stem()
        .ok_or_else(|| {
            CoreError::PathError(format!("failed to get filename stem for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

/// Calculates the percentage size reduction from input to output as
/// `(1 - out/in) * 100`. Returns `None` when the input size is zero, where
/// the ratio is undefined. Negative values mean the output grew.
#[must_use]
pub fn size_reduction_percent(size_in: u64, size_out: u64) -> Option<f64> {
    if size_in == 0 {
        None
    } else {
        Some((1.0 - size_out as f64 / size_in as f64) * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KiB");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MiB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GiB");
    }

    #[test]
    fn test_format_duration_seconds() {
        assert_eq!(format_duration_seconds(0.0), "00:00:00");
        assert_eq!(format_duration_seconds(59.0), "00:00:59");
        assert_eq!(format_duration_seconds(3661.0), "01:01:01");
        assert_eq!(format_duration_seconds(59.9), "00:00:59");

        assert_eq!(format_duration_seconds(-1.0), "??:??:??");
        assert_eq!(format_duration_seconds(f64::NAN), "??:??:??");
        assert_eq!(format_duration_seconds(f64::INFINITY), "??:??:??");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(
            file_stem(Path::new("/path/to/video.mp4")).unwrap(),
            "video"
        );
        assert_eq!(file_stem(Path::new("video.mp4")).unwrap(), "video");
        assert!(file_stem(Path::new("/")).is_err());
        assert!(file_stem(Path::new("")).is_err());
    }

    #[test]
    fn test_size_reduction_percent() {
        assert_eq!(size_reduction_percent(1000, 250), Some(75.0));
        assert_eq!(size_reduction_percent(100, 100), Some(0.0));
        // Output larger than input reports a negative reduction.
        assert_eq!(size_reduction_percent(100, 150), Some(-50.0));
        // Zero input size is undefined, never a NaN or infinity.
        assert_eq!(size_reduction_percent(0, 100), None);
        assert_eq!(size_reduction_percent(0, 0), None);
    }
}
