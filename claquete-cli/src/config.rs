//! Default values for the claquete CLI.

/// Default CRF quality. Higher means more compression and a smaller file.
pub const DEFAULT_CRF: u8 = 22;

/// Default audio bitrate in kbps.
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 160;
