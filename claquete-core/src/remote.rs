//! Remote-service encoding backend.
//!
//! The original tool also ships a variant that uploads the input to an HTTP
//! compression endpoint and downloads the encoded result. The network
//! client itself is an external collaborator; this module only adapts such
//! a client to the shared job state machine.

use std::path::Path;

use crate::backend::{EncodeBackend, EncodePlan};
use crate::error::{CoreError, CoreResult};
use crate::external::MediaInfo;
use crate::job::{CancelToken, ProgressSink};
use crate::presets::EncodeParameters;

/// Caller-supplied transport that performs probing and compression on a
/// remote service.
pub trait RemoteTransport {
    /// Returns metadata for the input, as reported by the service.
    fn probe(&self, input_path: &Path) -> CoreResult<MediaInfo>;

    /// Uploads the input, compresses it with `params`, and writes the
    /// encoded result to `output_path`.
    fn compress(
        &self,
        input_path: &Path,
        params: &EncodeParameters,
        output_path: &Path,
    ) -> CoreResult<()>;
}

/// Backend that delegates probing and encoding to a [`RemoteTransport`].
///
/// Remote services give no streaming progress, so the sink sees a single
/// coarse 0 -> 1 transition around the transfer.
pub struct RemoteApiBackend {
    transport: Box<dyn RemoteTransport>,
}

impl RemoteApiBackend {
    #[must_use]
    pub fn new(transport: Box<dyn RemoteTransport>) -> Self {
        Self { transport }
    }
}

impl EncodeBackend for RemoteApiBackend {
    fn probe(&self, input_path: &Path) -> CoreResult<MediaInfo> {
        self.transport.probe(input_path)
    }

    fn encode(
        &self,
        plan: &EncodePlan,
        sink: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> CoreResult<()> {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        sink.progress(0.0, 0.0, plan.duration_secs);

        self.transport
            .compress(&plan.input_path, &plan.params, &plan.output_path)?;

        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        sink.progress(1.0, plan.duration_secs, plan.duration_secs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::job::{EncodeRequest, Job, JobState};
    use crate::presets::{EncodeOptions, PresetChoice};

    struct FakeTransport {
        output: Vec<u8>,
    }

    impl RemoteTransport for FakeTransport {
        fn probe(&self, input_path: &Path) -> CoreResult<MediaInfo> {
            Ok(MediaInfo {
                duration_secs: 10.0,
                width: 1920,
                height: 1080,
                size_bytes: std::fs::metadata(input_path)?.len(),
            })
        }

        fn compress(
            &self,
            _input_path: &Path,
            _params: &EncodeParameters,
            output_path: &Path,
        ) -> CoreResult<()> {
            std::fs::write(output_path, &self.output)?;
            Ok(())
        }
    }

    #[test]
    fn remote_backend_drives_the_same_job_state_machine() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("clip.mp4");
        std::fs::write(&input_path, vec![0u8; 1000]).unwrap();

        let backend = RemoteApiBackend::new(Box::new(FakeTransport {
            output: vec![0u8; 250],
        }));
        let config = CoreConfig::new(dir.path().join("out"));

        let mut fractions = Vec::new();
        let mut sink = |fraction: f64, _elapsed: f64, _total: f64| fractions.push(fraction);

        let report = Job::new(EncodeRequest {
            input_path,
            preset: PresetChoice::KeepOriginal,
            options: EncodeOptions::default(),
        })
        .run(&backend, &config, &mut sink, &CancelToken::new());

        assert_eq!(report.state, JobState::Succeeded);
        let stats = report.result.unwrap();
        assert_eq!(stats.size_in, 1000);
        assert_eq!(stats.size_out, 250);
        assert_eq!(stats.reduction_pct, Some(75.0));
        assert!(stats.output_path.is_file());
        assert_eq!(fractions, vec![0.0, 1.0]);
    }

    #[test]
    fn pre_cancelled_remote_job_fails_with_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("clip.mp4");
        std::fs::write(&input_path, vec![0u8; 100]).unwrap();

        let backend = RemoteApiBackend::new(Box::new(FakeTransport { output: vec![] }));
        let config = CoreConfig::new(dir.path().join("out"));

        let cancel = CancelToken::new();
        cancel.cancel();

        let mut sink = |_: f64, _: f64, _: f64| {};
        let report = Job::new(EncodeRequest {
            input_path,
            preset: PresetChoice::KeepOriginal,
            options: EncodeOptions::default(),
        })
        .run(&backend, &config, &mut sink, &cancel);

        assert_eq!(report.state, JobState::Failed);
        assert!(matches!(report.result, Err(CoreError::Cancelled)));
    }
}
