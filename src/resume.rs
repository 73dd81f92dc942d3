//! Resume / reconciliation pass.
//! Finishes case-only renames that an interrupted run left staged under a
//! hidden `.webnorm.*.tmp` name. Runs per directory before the walk touches it,
//! so re-running after a crash self-heals.

use std::path::Path;
use tracing::{info, warn};

use crate::fs_ops::{recorded_target, safe_move, target_sidecar, Entry, TEMP_PREFIX, TEMP_SUFFIX};

/// True if `entry` looks like one of our staging names.
pub fn is_staged(entry: &Entry) -> bool {
    entry
        .name
        .to_str()
        .is_some_and(|n| n.starts_with(TEMP_PREFIX) && n.ends_with(TEMP_SUFFIX))
}

/// True for any name this tool creates for its own bookkeeping.
pub fn is_internal(entry: &Entry) -> bool {
    entry.name.to_str().is_some_and(|n| n.starts_with(TEMP_PREFIX))
}

/// Move every staged entry in `dir` to the name it was headed for.
/// Returns how many entries were recovered.
pub fn recover_staged(dir: &Path, entries: &[Entry]) -> usize {
    let mut recovered = 0;
    for entry in entries.iter().filter(|e| is_staged(e)) {
        let tmp = dir.join(&entry.name);
        let Some(target) = recorded_target(&tmp) else {
            warn!(
                path = %tmp.display(),
                "Staged entry without a recorded target; leaving it in place"
            );
            continue;
        };
        match safe_move(&tmp, &dir.join(&target)) {
            Ok(out) => {
                info!(
                    tmp = %tmp.display(),
                    dest = %out.path.display(),
                    "Recovered interrupted rename"
                );
                if let Some(sidecar) = target_sidecar(&tmp) {
                    let _ = std::fs::remove_file(sidecar);
                }
                recovered += 1;
            }
            Err(e) => {
                warn!(tmp = %tmp.display(), error = %e, "Could not recover staged entry");
            }
        }
    }
    recovered
}
