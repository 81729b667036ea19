//! Interactions with the external command-line tools (ffmpeg, ffprobe).

use std::io;
use std::process::{Command, Stdio};

use crate::error::{CoreError, CoreResult};

/// Media metadata probing via ffprobe.
pub mod ffprobe;

/// ffmpeg argument-list construction.
pub mod ffmpeg;

pub use ffmpeg::build_encode_args;
pub use ffprobe::{MediaInfo, probe_media};

/// Checks that a required external command is available and executable.
///
/// Runs the command with `-version` and discards its output; only the fact
/// that it launched matters.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("dependency '{cmd_name}' not found");
            Err(CoreError::SpawnFailed {
                tool: cmd_name.to_string(),
                source: e,
            })
        }
        Err(e) => {
            log::error!("failed to start dependency check for '{cmd_name}': {e}");
            Err(CoreError::SpawnFailed {
                tool: cmd_name.to_string(),
                source: e,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_dependency_reports_missing_binaries() {
        let result = check_dependency("claquete-no-such-tool");
        assert!(matches!(result, Err(CoreError::SpawnFailed { .. })));
    }

    #[test]
    fn check_dependency_finds_common_binaries() {
        // `sh` takes -version as a script file it cannot find and exits
        // non-zero, which still counts as launchable.
        assert!(check_dependency("sh").is_ok());
    }
}
