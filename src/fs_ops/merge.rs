//! Directory merge.
//! Drains a source directory into an existing destination directory, recursing
//! into same-named subdirectories and never overwriting anything, then removes
//! the emptied source.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::errors::WebnormError;

use super::atomic::rename_entry;
use super::collision::resolve_collision;
use super::entry::list_entries;
use super::util::{is_real_dir, path_occupied};

/// What a merge did. Entry counts cover every nesting level.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Entries moved under their own name.
    pub moved: usize,
    /// Entries moved under an alternate name because the name was taken.
    pub renamed: usize,
    /// Nested directory pairs merged recursively.
    pub merged_dirs: usize,
    /// Entries that could not be moved and stayed in the source.
    pub failed: usize,
    /// Source directories left behind because they were not empty.
    pub leftovers: Vec<PathBuf>,
}

impl MergeOutcome {
    /// True when every entry was moved and every source directory removed.
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.leftovers.is_empty()
    }
}

/// Merge the contents of `src` into `dst` (which must already be a directory).
///
/// Errors only if `src` cannot be listed; per-entry failures are logged and
/// counted, and a source that cannot be removed is reported as a leftover.
pub fn merge_dirs(src: &Path, dst: &Path) -> Result<MergeOutcome> {
    let mut outcome = MergeOutcome::default();
    merge_into(src, dst, &mut outcome)?;
    info!(
        src = %src.display(),
        dst = %dst.display(),
        moved = outcome.moved,
        renamed = outcome.renamed,
        failed = outcome.failed,
        "Merged directory"
    );
    Ok(outcome)
}

fn merge_into(src: &Path, dst: &Path, outcome: &mut MergeOutcome) -> Result<()> {
    let entries = list_entries(src)?;

    for entry in entries {
        let from = src.join(&entry.name);
        let to = dst.join(&entry.name);

        let step = if entry.is_dir() && is_real_dir(&to) {
            debug!(src = %from.display(), dst = %to.display(), "merging nested directory");
            outcome.merged_dirs += 1;
            merge_into(&from, &to, outcome)
        } else if path_occupied(&to) {
            let alt = resolve_collision(&to);
            warn!(
                src = %from.display(),
                taken = %to.display(),
                dest = %alt.display(),
                "Name taken during merge; using alternate name"
            );
            rename_entry(&from, &alt, "move conflicting entry").map(|()| outcome.renamed += 1)
        } else {
            rename_entry(&from, &to, "move entry").map(|()| outcome.moved += 1)
        };

        if let Err(e) = step {
            outcome.failed += 1;
            error!(
                entry = %from.display(),
                error = %e,
                "Failed to merge entry; leaving it in place"
            );
        }
    }

    if let Err(e) = fs::remove_dir(src) {
        let err = WebnormError::MergeIncomplete {
            dir: src.to_path_buf(),
        };
        warn!(code = err.code(), kind = err.kind(), error = %e, "{err}");
        outcome.leftovers.push(src.to_path_buf());
    }
    Ok(())
}
