//! Collision resolution for occupied destinations.
//!
//! Policy (shared by file renames, directory renames onto non-directories and
//! merge conflicts):
//! - `<stem>_<YYYYmmddHHMMSS><NN>[.<ext>]`, local wall-clock time at second
//!   precision plus a two-digit tiebreaker from a process-wide counter.
//! - Candidates are tried until one is free; the stem is truncated so the
//!   whole name fits the platform filename limit.
//!
//! Notes:
//! - Only the current filesystem state is consulted. A concurrent writer could
//!   still claim the returned name before the caller renames into it.

use chrono::Local;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

use super::util::path_occupied;

static TIEBREAK: AtomicU32 = AtomicU32::new(0);

/// Two-digit tiebreaker in 10..=99.
fn next_tiebreak() -> u32 {
    10 + TIEBREAK.fetch_add(1, Ordering::Relaxed) % 90
}

/// Return `desired` if nothing occupies it, else a free timestamp-suffixed sibling.
///
/// Examples (at 2026-10-19 14:03:22):
/// - "dir/foo.png" -> "dir/foo_2026101914032210.png"
/// - "dir/album"   -> "dir/album_2026101914032211"
pub fn resolve_collision(desired: &Path) -> PathBuf {
    if !path_occupied(desired) {
        return desired.to_path_buf();
    }

    let dir = desired.parent().unwrap_or_else(|| Path::new(""));
    let name = desired.file_name().unwrap_or_else(|| OsStr::new("untitled"));
    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from(name));
    let ext: Option<OsString> = base.extension().map(|e| e.to_os_string());

    let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();

    // Every tiebreaker value once, then extend with a counter.
    for _ in 0..90 {
        let suffix = format!("_{stamp}{:02}", next_tiebreak());
        let candidate = dir.join(build_name_with_suffix(&stem, ext.as_deref(), &suffix));
        if !path_occupied(&candidate) {
            return candidate;
        }
    }
    trace!(
        name = ?name,
        dir = %dir.display(),
        "collision: all tiebreakers taken, extending suffix"
    );

    first_free_counted(dir, &stem, ext.as_deref(), &stamp, next_tiebreak())
}

/// First free `<stem>_<stamp><nn>_<n>[.<ext>]` for n = 2, 3, ...
///
/// Never hands back an occupied candidate; a directory holds finitely many
/// names, so the search always ends.
fn first_free_counted(
    dir: &Path,
    stem: &OsStr,
    ext: Option<&OsStr>,
    stamp: &str,
    nn: u32,
) -> PathBuf {
    let mut n: u64 = 2;
    loop {
        let suffix = format!("_{stamp}{nn:02}_{n}");
        let candidate = dir.join(build_name_with_suffix(stem, ext, &suffix));
        if !path_occupied(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// Conservative filename limits (bytes/characters, platform-specific and approximate).
#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240; // leave headroom for legacy MAX_PATH
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255; // typical POSIX/EXT limits

/// Measure the approximate length of an OsStr for filename budgeting.
#[cfg(unix)]
fn name_len_units(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn name_len_units(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// Truncate the stem if needed so `stem + suffix + ["." + ext]` fits MAX_FILENAME_LEN.
fn build_name_with_suffix(stem: &OsStr, ext: Option<&OsStr>, suffix: &str) -> OsString {
    let mut overhead = name_len_units(OsStr::new(suffix));
    let mut ext_part = OsString::new();
    if let Some(e) = ext {
        overhead = overhead.saturating_add(1 + name_len_units(e)); // dot + ext
        ext_part.push(".");
        ext_part.push(e);
    }

    let mut stem_os = stem.to_os_string();
    if name_len_units(&stem_os) + overhead > MAX_FILENAME_LEN {
        let budget = MAX_FILENAME_LEN.saturating_sub(overhead);
        // Normalized names are ASCII, so char-wise truncation is byte-exact here.
        let lossy = stem.to_string_lossy();
        let mut acc = String::new();
        for ch in lossy.chars() {
            if acc.len() + ch.len_utf8() > budget {
                break;
            }
            acc.push(ch);
        }
        if acc.is_empty() {
            acc.push('f');
        }
        stem_os = OsString::from(acc);
    }

    let mut new_name = OsString::new();
    new_name.push(&stem_os);
    new_name.push(suffix);
    new_name.push(&ext_part);
    new_name
}
