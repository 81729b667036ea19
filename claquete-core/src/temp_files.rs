//! Temporary file management utilities.
//!
//! Each encode job gets its own scratch directory. Cleanup happens through
//! the tempfile crate's Drop implementation, so it runs on every exit path
//! including cancellation and panics.

use std::path::Path;
use tempfile::{Builder as TempFileBuilder, TempDir};

use crate::error::CoreResult;

/// Creates a temporary directory with prefix. Auto-cleaned when dropped.
pub fn create_temp_dir(base_dir: &Path, prefix: &str) -> CoreResult<TempDir> {
    std::fs::create_dir_all(base_dir)?;

    Ok(TempFileBuilder::new()
        .prefix(&format!("{prefix}_"))
        .tempdir_in(base_dir)?)
}
