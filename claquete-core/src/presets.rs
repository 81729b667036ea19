//! Preset resolution: mapping a user-facing preset choice plus the probed
//! resolution into concrete encoder parameters.
//!
//! Resolution is a pure function with no I/O. Caller-supplied knobs (CRF,
//! speed, audio bitrate) are validated against their domains rather than
//! silently clamped; the scale decision has no caller override.

use crate::config::{AUDIO_BITRATES_KBPS, CRF_MAX, CRF_MIN, DEFAULT_AUDIO_BITRATE_KBPS, DEFAULT_CRF};
use crate::error::{CoreError, CoreResult};
use crate::external::MediaInfo;

/// User-facing quality/size preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetChoice {
    /// "HD recommended": downscale anything taller than 1080 lines.
    TargetHd,
    /// "SD": downscale anything taller than 720 lines.
    TargetSd,
    /// "Keep original": re-encode at the source resolution.
    KeepOriginal,
}

impl PresetChoice {
    /// Label shown to users, matching the original tool's wording.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            PresetChoice::TargetHd => "HD recommended",
            PresetChoice::TargetSd => "SD",
            PresetChoice::KeepOriginal => "Keep original",
        }
    }

    /// Vertical pixel target this preset downscales to, if any.
    #[must_use]
    pub fn target_height(&self) -> Option<u32> {
        match self {
            PresetChoice::TargetHd => Some(1080),
            PresetChoice::TargetSd => Some(720),
            PresetChoice::KeepOriginal => None,
        }
    }
}

/// Encoder speed/quality tradeoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedProfile {
    Fast,
    Medium,
}

impl SpeedProfile {
    /// The ffmpeg `-preset` name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedProfile::Fast => "fast",
            SpeedProfile::Medium => "medium",
        }
    }

    /// Parses a speed profile name, rejecting anything outside the
    /// recognized set.
    pub fn from_name(name: &str) -> CoreResult<Self> {
        match name {
            "fast" => Ok(SpeedProfile::Fast),
            "medium" => Ok(SpeedProfile::Medium),
            other => Err(CoreError::InvalidParameter(format!(
                "unrecognized speed profile '{other}' (expected fast or medium)"
            ))),
        }
    }
}

/// Caller-supplied encoding knobs, validated during preset resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// CRF quality value, must be within [`CRF_MIN`]..=[`CRF_MAX`].
    pub crf: u8,
    pub speed: SpeedProfile,
    /// Audio bitrate in kbps, must be one of [`AUDIO_BITRATES_KBPS`].
    pub audio_bitrate_kbps: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            crf: DEFAULT_CRF,
            speed: SpeedProfile::Fast,
            audio_bitrate_kbps: DEFAULT_AUDIO_BITRATE_KBPS,
        }
    }
}

/// Concrete parameter set handed to the encoder. Derived deterministically
/// from the preset choice and the probed height; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeParameters {
    /// Aspect-preserving downscale filter, absent when the source already
    /// fits the target.
    pub scale_filter: Option<String>,
    pub crf: u8,
    pub speed: SpeedProfile,
    pub audio_bitrate_kbps: u32,
}

/// Resolves a preset choice against the probed media info and caller options.
pub fn resolve(
    choice: PresetChoice,
    info: &MediaInfo,
    options: EncodeOptions,
) -> CoreResult<EncodeParameters> {
    if options.crf < CRF_MIN || options.crf > CRF_MAX {
        return Err(CoreError::InvalidParameter(format!(
            "CRF {} outside [{CRF_MIN}, {CRF_MAX}]",
            options.crf
        )));
    }
    if !AUDIO_BITRATES_KBPS.contains(&options.audio_bitrate_kbps) {
        return Err(CoreError::InvalidParameter(format!(
            "audio bitrate {} kbps not one of {AUDIO_BITRATES_KBPS:?}",
            options.audio_bitrate_kbps
        )));
    }

    let scale_filter = choice
        .target_height()
        .filter(|&target| info.height > target)
        .map(|target| format!("scale=-2:{target}"));

    Ok(EncodeParameters {
        scale_filter,
        crf: options.crf,
        speed: options.speed,
        audio_bitrate_kbps: options.audio_bitrate_kbps,
    })
}
