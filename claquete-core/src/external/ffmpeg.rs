//! ffmpeg command-line construction for the compression encode.
//!
//! The flag set mirrors the original render profile: libx264 with fixed
//! profile/level/pixel-format, a constant keyframe cadence with scene-cut
//! detection disabled, a fixed x264 tuning string, AAC audio, and a
//! fast-start MP4 container. Progress is requested as machine-parsable
//! key=value lines on stdout.

use std::path::Path;

use crate::presets::EncodeParameters;

/// Video codec used for every encode.
const VIDEO_CODEC: &str = "libx264";

/// H.264 profile/level pinned for player compatibility.
const H264_PROFILE: &str = "high";
const H264_LEVEL: &str = "4.1";

const PIXEL_FORMAT: &str = "yuv420p";

/// Keyframe every 48 frames, scene-cut insertion off.
const KEYFRAME_INTERVAL: u32 = 48;
const SCENE_CUT_THRESHOLD: u32 = 0;

/// Reference frames, B-frames and adaptive quantization tuning.
const X264_PARAMS: &str = "ref=4:bframes=3:aq-mode=2:aq-strength=1.0";

const AUDIO_CODEC: &str = "aac";

/// Builds the complete ffmpeg argument list for one encode.
#[must_use]
pub fn build_encode_args(
    input_path: &Path,
    output_path: &Path,
    params: &EncodeParameters,
    threads: usize,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        input_path.to_string_lossy().into_owned(),
    ];

    if let Some(filter) = &params.scale_filter {
        args.push("-vf".to_string());
        args.push(filter.clone());
    }

    args.extend([
        "-c:v".to_string(),
        VIDEO_CODEC.to_string(),
        "-crf".to_string(),
        params.crf.to_string(),
        "-preset".to_string(),
        params.speed.as_str().to_string(),
        "-profile:v".to_string(),
        H264_PROFILE.to_string(),
        "-level".to_string(),
        H264_LEVEL.to_string(),
        "-pix_fmt".to_string(),
        PIXEL_FORMAT.to_string(),
        "-g".to_string(),
        KEYFRAME_INTERVAL.to_string(),
        "-sc_threshold".to_string(),
        SCENE_CUT_THRESHOLD.to_string(),
        "-x264-params".to_string(),
        X264_PARAMS.to_string(),
        "-threads".to_string(),
        threads.to_string(),
        "-c:a".to_string(),
        AUDIO_CODEC.to_string(),
        "-b:a".to_string(),
        format!("{}k", params.audio_bitrate_kbps),
        "-movflags".to_string(),
        "+faststart".to_string(),
        "-progress".to_string(),
        "pipe:1".to_string(),
        "-nostats".to_string(),
        output_path.to_string_lossy().into_owned(),
    ]);

    args
}
