//! Config validation logic.
//! Verifies the root directory, tidies the extension and base URL, and checks
//! that the manifest can be written where requested.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use crate::errors::WebnormError;

use super::types::Config;

/// Validate `cfg` and rewrite its values into canonical form.
///
/// - root: must exist, be a directory and be readable; canonicalized.
/// - extension: trimmed, leading '.' dropped, lowercase ASCII alphanumeric.
/// - base_url: trimmed; a non-empty URL gains a trailing '/'.
/// - output: parent directory must exist when the manifest is enabled.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    ensure_root(&cfg.root)?;
    cfg.root = dunce::canonicalize(&cfg.root)
        .with_context(|| format!("canonicalize root '{}'", cfg.root.display()))?;

    let ext = cfg.extension.trim().trim_start_matches('.').to_ascii_lowercase();
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        error!("invalid extension: '{}'", cfg.extension);
        bail!(
            "extension must be ASCII letters/digits (e.g. 'png'), got '{}'",
            cfg.extension
        );
    }
    cfg.extension = ext;

    let url = cfg.base_url.trim();
    cfg.base_url = if url.is_empty() || url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    };

    if cfg.manifest {
        let parent = cfg
            .output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !parent.is_dir() {
            error!("output directory does not exist: {}", parent.display());
            bail!(
                "output directory does not exist: {} (manifest '{}')",
                parent.display(),
                cfg.output.display()
            );
        }
    }

    if cfg.normalize && !cfg.dry_run {
        ensure_writable(&cfg.root)?;
    }

    info!(
        root = %cfg.root.display(),
        extension = %cfg.extension,
        output = %cfg.output.display(),
        dry_run = cfg.dry_run,
        "Config validated"
    );
    Ok(())
}

/// Root must exist, be a directory and be listable.
fn ensure_root(root: &Path) -> Result<()> {
    let meta = fs::metadata(root).ok();
    if !meta.is_some_and(|m| m.is_dir()) || fs::read_dir(root).is_err() {
        let err = WebnormError::RootInvalid(root.to_path_buf());
        error!(code = err.code(), kind = err.kind(), "{err}");
        return Err(err.into());
    }
    debug!("root readable: {}", root.display());
    Ok(())
}

/// Ensure directory is writable by creating and removing a scratch file.
fn ensure_writable(dir: &Path) -> Result<()> {
    let scratch = dir.join(format!(".webnorm.writecheck.{}", std::process::id()));
    fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&scratch)
        .with_context(|| format!("Cannot write to root '{}'; check permissions", dir.display()))?;
    let _ = fs::remove_file(&scratch);
    debug!("root writable: {}", dir.display());
    Ok(())
}
