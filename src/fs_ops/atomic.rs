//! Rename helper.
//! - Performs a plain rename with MoveFailed errors; callers guarantee `dst` is free.
//! - On Unix, best-effort fsync of the destination directory after rename.

use anyhow::Result;
use std::fs;
use std::path::Path;

use super::helpers::io_error_with_help;

pub(crate) fn rename_entry(src: &Path, dst: &Path, op: &str) -> Result<()> {
    fs::rename(src, dst).map_err(io_error_with_help(op, src))?;

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let _ = super::util::fsync_dir(parent);
    }

    Ok(())
}
