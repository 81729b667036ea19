//! Core library for video compression using ffmpeg and ffprobe.
//!
//! This crate probes an input file's metadata, derives concrete encoder
//! parameters from a small set of quality presets, drives an external
//! encoding process while translating its streaming progress output into a
//! normalized completion fraction, and reports final size statistics.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use claquete_core::{
//!     CancelToken, CoreConfig, EncodeOptions, EncodeRequest, Job,
//!     LocalProcessBackend, PresetChoice,
//! };
//! use std::path::PathBuf;
//!
//! let config = CoreConfig::new(PathBuf::from("/path/to/output"));
//! let backend = LocalProcessBackend::from_config(&config);
//!
//! let job = Job::new(EncodeRequest {
//!     input_path: PathBuf::from("/path/to/input.mp4"),
//!     preset: PresetChoice::TargetHd,
//!     options: EncodeOptions::default(),
//! });
//!
//! let mut sink = |fraction: f64, _elapsed: f64, _total: f64| {
//!     println!("{:.0}%", fraction * 100.0);
//! };
//! let report = job.run(&backend, &config, &mut sink, &CancelToken::new());
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod external;
pub mod job;
pub mod presets;
pub mod process;
pub mod progress;
pub mod remote;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use backend::{EncodeBackend, EncodePlan, LocalProcessBackend};
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use external::{MediaInfo, check_dependency, probe_media};
pub use job::{
    CancelToken, EncodeRequest, EncodeStats, Job, JobReport, JobState, ProgressSink,
};
pub use presets::{EncodeOptions, EncodeParameters, PresetChoice, SpeedProfile};
pub use progress::{ProgressSample, ProgressTracker, parse_progress_line};
pub use remote::{RemoteApiBackend, RemoteTransport};
pub use utils::{format_bytes, format_duration_seconds, size_reduction_percent};
