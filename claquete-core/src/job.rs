//! Job orchestration: the encode state machine.
//!
//! A [`Job`] walks `Created -> Probing -> Parameterizing -> Encoding ->
//! Finalizing` and ends in `Succeeded` or `Failed`. Terminal states are
//! final; `run` consumes the job, so a retry always means constructing a
//! new one. All failures during probing and parameterizing surface before
//! any encoder process is spawned, and the backend contract guarantees a
//! spawned process is reaped before an encoding failure is surfaced.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::backend::{EncodeBackend, EncodePlan};
use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::presets::{self, EncodeOptions, PresetChoice};
use crate::temp_files;
use crate::utils::{file_stem, size_reduction_percent};

/// Receives progress callbacks during the encoding state.
///
/// Callbacks run on the thread draining the encoder's output; they must not
/// block for unbounded time or the encoder itself stalls on a full pipe.
pub trait ProgressSink {
    /// `fraction` is in [0, 1]; it stays 0.0 when the total duration is
    /// unknown.
    fn progress(&mut self, fraction: f64, elapsed_secs: f64, total_secs: f64);
}

impl<F: FnMut(f64, f64, f64)> ProgressSink for F {
    fn progress(&mut self, fraction: f64, elapsed_secs: f64, total_secs: f64) {
        self(fraction, elapsed_secs, total_secs);
    }
}

/// Cloneable cancellation signal shared between the caller and a running
/// job.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal. The running job terminates its encoder process
    /// and fails with [`CoreError::Cancelled`](crate::error::CoreError).
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lifecycle states of one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    Probing,
    Parameterizing,
    Encoding,
    Finalizing,
    Succeeded,
    Failed,
}

/// The caller's description of one unit of work.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub input_path: PathBuf,
    pub preset: PresetChoice,
    pub options: EncodeOptions,
}

/// Statistics for a completed encode.
#[derive(Debug, Clone)]
pub struct EncodeStats {
    pub output_path: PathBuf,
    pub size_in: u64,
    pub size_out: u64,
    /// `None` when the input size was zero, where the ratio is undefined.
    pub reduction_pct: Option<f64>,
    pub encode_time: Duration,
}

/// Terminal outcome of one job run.
#[derive(Debug)]
pub struct JobReport {
    pub state: JobState,
    pub result: CoreResult<EncodeStats>,
}

/// One encode job. Owns at most one external process at a time (through the
/// backend) and its own scratch directory.
pub struct Job {
    request: EncodeRequest,
    state: JobState,
}

impl Job {
    #[must_use]
    pub fn new(request: EncodeRequest) -> Self {
        Self {
            request,
            state: JobState::Created,
        }
    }

    #[must_use]
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Runs the job to completion. Blocks the calling thread for the full
    /// duration of probing plus encoding; callers needing concurrency run
    /// this on a separate thread and use a thread-safe sink.
    pub fn run<B: EncodeBackend + ?Sized>(
        mut self,
        backend: &B,
        config: &CoreConfig,
        sink: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> JobReport {
        let result = self.execute(backend, config, sink, cancel);
        self.state = match result {
            Ok(_) => JobState::Succeeded,
            Err(ref e) => {
                log::warn!("job failed for {}: {e}", self.request.input_path.display());
                JobState::Failed
            }
        };
        JobReport {
            state: self.state,
            result,
        }
    }

    fn enter(&mut self, next: JobState) {
        log::debug!(
            "job {}: {:?} -> {next:?}",
            self.request.input_path.display(),
            self.state
        );
        self.state = next;
    }

    fn execute<B: EncodeBackend + ?Sized>(
        &mut self,
        backend: &B,
        config: &CoreConfig,
        sink: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> CoreResult<EncodeStats> {
        config.validate()?;
        let started = Instant::now();

        self.enter(JobState::Probing);
        let info = backend.probe(&self.request.input_path)?;
        log::info!(
            "probed {}: {}x{}, {:.2}s, {} bytes",
            self.request.input_path.display(),
            info.width,
            info.height,
            info.duration_secs,
            info.size_bytes
        );

        self.enter(JobState::Parameterizing);
        let params = presets::resolve(self.request.preset, &info, self.request.options)?;

        let stem = file_stem(&self.request.input_path)?;
        let output_name = format!("{stem}_compressed.mp4");
        let scratch_base = config.temp_dir.as_deref().unwrap_or(&config.output_dir);
        // Scratch dir is removed on every exit path, including cancellation,
        // when it drops at the end of this function.
        let work_dir = temp_files::create_temp_dir(scratch_base, "claquete")?;
        let scratch_output = work_dir.path().join(&output_name);

        let plan = EncodePlan {
            input_path: self.request.input_path.clone(),
            output_path: scratch_output.clone(),
            params,
            duration_secs: info.duration_secs,
            threads: config.effective_threads(),
        };

        self.enter(JobState::Encoding);
        backend.encode(&plan, sink, cancel)?;

        self.enter(JobState::Finalizing);
        let size_out = fs::metadata(&scratch_output)?.len();
        let output_path = config.output_dir.join(&output_name);
        persist_output(&scratch_output, &output_path)?;

        let size_in = info.size_bytes;
        Ok(EncodeStats {
            output_path,
            size_in,
            size_out,
            reduction_pct: size_reduction_percent(size_in, size_out),
            encode_time: started.elapsed(),
        })
    }
}

/// Moves the finished scratch file to its final location. `rename` fails
/// across filesystems, so fall back to copy + remove.
fn persist_output(from: &Path, to: &Path) -> CoreResult<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::rename(from, to).is_err() {
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}
