//! FFprobe integration: structured metadata for one input file.

use std::path::Path;

use ffprobe::{FfProbeError, ffprobe};

use crate::error::{CoreError, CoreResult, probe_failed};

/// Metadata describing one input file. Produced once per job and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    /// Container duration in seconds.
    pub duration_secs: f64,
    /// Width of the first video stream.
    pub width: u32,
    /// Height of the first video stream.
    pub height: u32,
    /// Input file size in bytes.
    pub size_bytes: u64,
}

/// Inspects `path` with ffprobe and returns its structured metadata.
///
/// Duration comes from the format section; dimensions from the first stream
/// whose `codec_type` is `"video"`. Fails with
/// [`CoreError::NoVideoStream`] when no video track exists and
/// [`CoreError::ProbeFailed`] when the tool errors or its output cannot be
/// parsed.
pub fn probe_media(path: &Path) -> CoreResult<MediaInfo> {
    log::debug!("running ffprobe on: {}", path.display());

    let size_bytes = std::fs::metadata(path)?.len();

    let metadata = ffprobe(path).map_err(|err| map_ffprobe_error(path, err))?;

    let duration_secs = metadata
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| probe_failed(path, "missing or unparsable format.duration"))?;
    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(probe_failed(
            path,
            format!("invalid duration {duration_secs}"),
        ));
    }

    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CoreError::NoVideoStream(path.display().to_string()))?;

    let width = video_stream
        .width
        .ok_or_else(|| probe_failed(path, "video stream missing width"))?;
    let height = video_stream
        .height
        .ok_or_else(|| probe_failed(path, "video stream missing height"))?;
    if width <= 0 || height <= 0 {
        return Err(probe_failed(
            path,
            format!("invalid dimensions {width}x{height}"),
        ));
    }

    Ok(MediaInfo {
        duration_secs,
        width: width as u32,
        height: height as u32,
        size_bytes,
    })
}

fn map_ffprobe_error(path: &Path, err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => probe_failed(path, format!("failed to run ffprobe: {io_err}")),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            probe_failed(
                path,
                format!("ffprobe exited with {}: {}", output.status, stderr.trim()),
            )
        }
        FfProbeError::Deserialize(e) => {
            probe_failed(path, format!("unparsable ffprobe output: {e}"))
        }
        _ => probe_failed(path, format!("unknown ffprobe error: {err:?}")),
    }
}
