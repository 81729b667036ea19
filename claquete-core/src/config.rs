//! Configuration structures and constants for the claquete-core library.

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

// Default constants

/// Default CRF (Constant Rate Factor) quality value.
/// Higher values mean more compression and smaller files.
pub const DEFAULT_CRF: u8 = 22;

/// Lowest CRF value accepted from callers.
pub const CRF_MIN: u8 = 18;

/// Highest CRF value accepted from callers.
pub const CRF_MAX: u8 = 28;

/// Audio bitrates (kbps) accepted from callers.
pub const AUDIO_BITRATES_KBPS: [u32; 3] = [128, 160, 192];

/// Default audio bitrate in kbps.
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 160;

/// Main configuration structure for the claquete-core library.
///
/// Holds the paths and resource limits shared by all jobs. It is typically
/// created by the consumer of the library (e.g., claquete-cli) and passed to
/// [`Job::run`](crate::job::Job::run).
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory where the final output file will be placed.
    pub output_dir: PathBuf,

    /// Optional directory for per-job scratch space (defaults to `output_dir`).
    pub temp_dir: Option<PathBuf>,

    /// Optional upper bound on encoder threads. `None` uses every available
    /// CPU, matching the original tool; deployments sharing hardware set a
    /// cap explicitly.
    pub thread_cap: Option<usize>,

    /// Name or path of the encoder binary.
    pub ffmpeg_binary: String,

    /// Name or path of the inspection binary.
    pub ffprobe_binary: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            temp_dir: None,
            thread_cap: None,
            ffmpeg_binary: "ffmpeg".to_string(),
            ffprobe_binary: "ffprobe".to_string(),
        }
    }
}

impl CoreConfig {
    /// Creates a configuration with defaults for everything but the output directory.
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Self::default()
        }
    }

    /// Validates the configuration before any job is started.
    pub fn validate(&self) -> CoreResult<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidParameter(
                "output directory must not be empty".to_string(),
            ));
        }
        if self.thread_cap == Some(0) {
            return Err(CoreError::InvalidParameter(
                "thread cap must be at least 1".to_string(),
            ));
        }
        if self.ffmpeg_binary.is_empty() || self.ffprobe_binary.is_empty() {
            return Err(CoreError::InvalidParameter(
                "tool binary names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Encoder thread count: available CPUs bounded by the configured cap.
    #[must_use]
    pub fn effective_threads(&self) -> usize {
        let available = num_cpus::get().max(1);
        match self.thread_cap {
            Some(cap) => available.min(cap),
            None => available,
        }
    }
}
