//! Encoding backends.
//!
//! The job state machine is polymorphic over [`EncodeBackend`]; the two
//! variants are [`LocalProcessBackend`] (ffprobe + a local ffmpeg process)
//! and [`RemoteApiBackend`](crate::remote::RemoteApiBackend), which
//! delegates both steps to a remote compression service.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{MediaInfo, build_encode_args, probe_media};
use crate::job::{CancelToken, ProgressSink};
use crate::presets::EncodeParameters;
use crate::process::{LinePoll, OutputLine, ProcessHandle};
use crate::progress::{ProgressTracker, parse_progress_line};

/// How often the encode loop checks the cancellation token while the
/// encoder is quiet.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything a backend needs to perform one encode.
#[derive(Debug, Clone)]
pub struct EncodePlan {
    pub input_path: PathBuf,
    /// Scratch location inside the job's temporary directory; the
    /// orchestrator persists it to the final output path afterwards.
    pub output_path: PathBuf,
    pub params: EncodeParameters,
    /// Total duration used for fraction computation; 0.0 means unknown.
    pub duration_secs: f64,
    pub threads: usize,
}

/// The seam between the job state machine and whatever does the actual
/// probing and encoding.
pub trait EncodeBackend {
    /// Inspects the input file's metadata.
    fn probe(&self, input_path: &Path) -> CoreResult<MediaInfo>;

    /// Runs one encode to completion, streaming progress into `sink`.
    ///
    /// Implementations must honor `cancel` (returning
    /// [`CoreError::Cancelled`]) and must reap any process they spawned
    /// before returning, success or failure.
    fn encode(
        &self,
        plan: &EncodePlan,
        sink: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> CoreResult<()>;
}

/// Backend that shells out to local ffprobe/ffmpeg binaries.
#[derive(Debug, Clone)]
pub struct LocalProcessBackend {
    ffmpeg_binary: String,
}

impl LocalProcessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&CoreConfig::default())
    }

    #[must_use]
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            ffmpeg_binary: config.ffmpeg_binary.clone(),
        }
    }
}

impl Default for LocalProcessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeBackend for LocalProcessBackend {
    fn probe(&self, input_path: &Path) -> CoreResult<MediaInfo> {
        probe_media(input_path)
    }

    fn encode(
        &self,
        plan: &EncodePlan,
        sink: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> CoreResult<()> {
        let args = build_encode_args(&plan.input_path, &plan.output_path, &plan.params, plan.threads);
        let mut handle = ProcessHandle::spawn(&self.ffmpeg_binary, &args)?;

        let mut tracker = ProgressTracker::new(plan.duration_secs);
        let mut stderr_tail = String::new();
        let mut killed = false;

        loop {
            if cancel.is_cancelled() && !killed {
                log::info!("cancellation requested, terminating encoder");
                handle.kill();
                killed = true;
            }

            match handle.poll_line(CANCEL_POLL_INTERVAL) {
                LinePoll::Line(OutputLine::Stdout(line)) => {
                    if let Some(sample) = parse_progress_line(&line) {
                        let (fraction, elapsed) = tracker.observe(sample);
                        sink.progress(fraction, elapsed, plan.duration_secs);
                    }
                }
                LinePoll::Line(OutputLine::Stderr(line)) => {
                    log::debug!(target: "ffmpeg", "{line}");
                    stderr_tail.push_str(&line);
                    stderr_tail.push('\n');
                }
                LinePoll::Idle => {}
                LinePoll::Eof => break,
            }
        }

        // Reap before surfacing any error so no zombie outlives the job.
        let status = handle.wait()?;

        if killed || cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        if !status.success() {
            return Err(CoreError::EncodeFailed {
                tool: self.ffmpeg_binary.clone(),
                status,
                stderr: stderr_tail.trim().to_string(),
            });
        }
        Ok(())
    }
}
