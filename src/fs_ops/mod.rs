//! Filesystem operations: modularized.

mod atomic;
mod collision;
mod entry;
mod helpers;
mod merge;
mod safe_move;
mod util;

pub use collision::resolve_collision;
pub use entry::{list_entries, Entry, EntryKind};
pub use helpers::io_error_with_help;
pub use merge::{merge_dirs, MergeOutcome};
pub use safe_move::{safe_move, MoveKind, MoveOutcome};

pub(crate) use util::{recorded_target, target_sidecar, TEMP_PREFIX, TEMP_SUFFIX};
