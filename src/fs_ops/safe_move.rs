//! Single-entry move that never overwrites.
//!
//! Steps:
//! 1. Case-only renames (`Foo.png` -> `foo.png`) are staged through a hidden
//!    temporary sibling so case-insensitive filesystems see two distinct names.
//! 2. A directory moving onto an existing directory is merged into it.
//! 3. Any other occupied destination gets an alternate, timestamp-suffixed name.
//! 4. Otherwise a plain rename.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::atomic::rename_entry;
use super::collision::resolve_collision;
use super::helpers::io_error_with_help;
use super::merge::{merge_dirs, MergeOutcome};
use super::util::{
    differs_only_by_case, is_real_dir, path_occupied, staged_target, unique_temp_path,
    write_target_sidecar,
};

/// How the entry reached its final path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveKind {
    /// Source and destination were the same path.
    Unchanged,
    /// Renamed to the requested destination.
    Renamed,
    /// Requested destination was taken; moved to an alternate name.
    Collision,
    /// Directory merged into an existing directory.
    Merged(MergeOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Where the source content now lives.
    pub path: PathBuf,
    pub kind: MoveKind,
}

/// Move `src` to `dst` without overwriting existing content.
///
/// Returns the final location, which differs from `dst` only when the
/// destination was occupied by something that could not be merged.
pub fn safe_move(src: &Path, dst: &Path) -> Result<MoveOutcome> {
    if src == dst {
        return Ok(MoveOutcome {
            path: dst.to_path_buf(),
            kind: MoveKind::Unchanged,
        });
    }

    let src_is_dir = is_real_dir(src);

    if !differs_only_by_case(src, dst) {
        return move_into_place(src, dst, src_is_dir);
    }

    let staged = stage(src, dst)?;
    let tmp = staged.tmp.as_path();
    let mut result = move_into_place(tmp, dst, src_is_dir);
    let partial = matches!(
        &result,
        Ok(MoveOutcome { kind: MoveKind::Merged(m), .. }) if !m.leftovers.is_empty()
    );

    if (result.is_err() || partial) && path_occupied(tmp) {
        // Put what is left back under its original name so a later run can retry.
        match fs::rename(tmp, src) {
            Ok(()) => {
                if let Ok(MoveOutcome { kind: MoveKind::Merged(m), .. }) = &mut result {
                    relocate_leftovers(m, tmp, src);
                }
            }
            Err(e) => {
                error!(
                    tmp = %tmp.display(),
                    src = %src.display(),
                    error = %e,
                    "Failed to restore staged entry"
                );
            }
        }
    }

    if let Some(sidecar) = staged.sidecar
        && !path_occupied(tmp)
    {
        let _ = fs::remove_file(sidecar);
    }

    result
}

struct Staged {
    tmp: PathBuf,
    sidecar: Option<PathBuf>,
}

/// Rename `src` to a hidden staging name that records where it is headed.
fn stage(src: &Path, dst: &Path) -> Result<Staged> {
    let target = dst.file_name().unwrap_or_default();
    let tmp = unique_temp_path(src, target);
    let sidecar = if staged_target(tmp.file_name().unwrap_or_default()).is_none() {
        write_target_sidecar(&tmp, target)
            .map_err(io_error_with_help("record staging target", &tmp))?
    } else {
        None
    };
    if let Err(e) = fs::rename(src, &tmp) {
        if let Some(sc) = &sidecar {
            let _ = fs::remove_file(sc);
        }
        return Err(io_error_with_help("stage case-only rename", src)(e));
    }
    debug!(src = %src.display(), tmp = %tmp.display(), "staged case-only rename");
    Ok(Staged { tmp, sidecar })
}

/// Rewrite leftover paths recorded under `tmp` to live under `src` again.
fn relocate_leftovers(outcome: &mut MergeOutcome, tmp: &Path, src: &Path) {
    for p in &mut outcome.leftovers {
        if let Ok(rest) = p.strip_prefix(tmp) {
            *p = if rest.as_os_str().is_empty() {
                src.to_path_buf()
            } else {
                src.join(rest)
            };
        }
    }
}

fn move_into_place(from: &Path, dst: &Path, src_is_dir: bool) -> Result<MoveOutcome> {
    if src_is_dir && is_real_dir(dst) {
        let outcome = merge_dirs(from, dst)?;
        return Ok(MoveOutcome {
            path: dst.to_path_buf(),
            kind: MoveKind::Merged(outcome),
        });
    }

    let op = if src_is_dir { "rename directory" } else { "rename file" };

    if path_occupied(dst) {
        let alt = resolve_collision(dst);
        warn!(
            src = %from.display(),
            taken = %dst.display(),
            dest = %alt.display(),
            "Destination exists; using alternate name"
        );
        rename_entry(from, &alt, op)?;
        return Ok(MoveOutcome {
            path: alt,
            kind: MoveKind::Collision,
        });
    }

    rename_entry(from, dst, op)?;
    info!(src = %from.display(), dest = %dst.display(), "Renamed");
    Ok(MoveOutcome {
        path: dst.to_path_buf(),
        kind: MoveKind::Renamed,
    })
}
