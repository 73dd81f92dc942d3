//! Bottom-up tree normalization.
//!
//! Each directory level is listed once into a local, name-sorted vector. All
//! subdirectories are normalized before the level itself, then the level's
//! image files are renamed, then its subdirectories. Directory renames are
//! written back into the local listing so it always reflects what is on disk.
//!
//! Failures are handled per entry: logged, counted and skipped. Only a root
//! that cannot be listed aborts the walk.

use anyhow::Result;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::errors::WebnormError;
use crate::fs_ops::{list_entries, safe_move, Entry, EntryKind, MoveKind};
use crate::normalize::{destination_stem, is_normalized};
use crate::resume::{is_internal, is_staged, recover_staged};

/// Counters for one pass over the tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeSummary {
    pub files_renamed: usize,
    pub dirs_renamed: usize,
    /// Directories whose normalized name was taken by a directory and were merged into it.
    pub dirs_merged: usize,
    /// Entries that landed under an alternate, suffixed name.
    pub collisions: usize,
    /// Names that normalized to nothing and received the placeholder.
    pub degenerate: usize,
    /// Interrupted case-only renames finished during this pass.
    pub recovered: usize,
    /// Merge sources that could not be removed afterwards.
    pub merge_leftovers: usize,
    pub failures: usize,
}

impl TreeSummary {
    /// Number of renames and merges performed (or planned, on a dry run).
    pub fn changes(&self) -> usize {
        self.files_renamed + self.dirs_renamed + self.dirs_merged + self.recovered
    }
}

/// Normalize every qualifying name under `cfg.root` (the root itself keeps its name).
pub fn normalize_tree(cfg: &Config) -> Result<TreeSummary> {
    let mut summary = TreeSummary::default();
    let root_entries = normalize_level(cfg, &cfg.root, &mut summary)?;
    debug!(root = %cfg.root.display(), entries = root_entries.len(), "root level done");
    info!(
        root = %cfg.root.display(),
        files_renamed = summary.files_renamed,
        dirs_renamed = summary.dirs_renamed,
        dirs_merged = summary.dirs_merged,
        collisions = summary.collisions,
        failures = summary.failures,
        dry_run = cfg.dry_run,
        "Normalization pass finished"
    );
    Ok(summary)
}

/// Normalize one directory level, children first.
///
/// Returns the level's listing as it stands after this level's renames.
fn normalize_level(cfg: &Config, dir: &Path, summary: &mut TreeSummary) -> Result<Vec<Entry>> {
    let mut entries = list_entries(dir)?;

    if !cfg.dry_run && entries.iter().any(is_staged) {
        summary.recovered += recover_staged(dir, &entries);
        entries = list_entries(dir)?;
    }

    entries.retain(|e| {
        let keep = !is_internal(e) && (cfg.include_hidden || !e.is_hidden());
        if !keep {
            debug!(
                dir = %dir.display(),
                name = %e.name.to_string_lossy(),
                "skipping hidden entry"
            );
        }
        keep
    });

    for entry in entries.iter().filter(|e| e.is_dir()) {
        let child = dir.join(&entry.name);
        if let Err(e) = normalize_level(cfg, &child, summary) {
            summary.failures += 1;
            report_failure(&child, &e);
        }
    }

    for entry in entries.iter().filter(|e| e.kind == EntryKind::File) {
        normalize_file(cfg, dir, &entry.name, summary);
    }

    for entry in entries.iter_mut().filter(|e| e.is_dir()) {
        if let Some(new_name) = normalize_dir(cfg, dir, &entry.name, summary) {
            entry.name = new_name;
        }
    }

    let untouched = entries
        .iter()
        .filter(|e| matches!(e.kind, EntryKind::Symlink | EntryKind::Other));
    for entry in untouched {
        debug!(
            dir = %dir.display(),
            name = %entry.name.to_string_lossy(),
            "not a regular file or directory; left as is"
        );
    }

    // A merge leaves two listing slots pointing at the same directory.
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries.dedup_by(|a, b| a.name == b.name);
    Ok(entries)
}

fn normalize_file(cfg: &Config, dir: &Path, name: &OsStr, summary: &mut TreeSummary) {
    let display = name.to_string_lossy();
    if !cfg.matches_extension(&display) {
        return;
    }
    let Some((stem, ext)) = display.rsplit_once('.') else {
        return;
    };
    if is_normalized(stem) && !ext.bytes().any(|b| b.is_ascii_uppercase()) {
        return;
    }
    let (new_stem, degenerate) = destination_stem(stem);
    let new_name = format!("{new_stem}.{}", ext.to_ascii_lowercase());
    if name == OsStr::new(&new_name) {
        return;
    }
    if degenerate {
        summary.degenerate += 1;
    }
    if apply_rename(cfg, dir, name, &new_name, summary).is_some() {
        summary.files_renamed += 1;
    }
}

fn normalize_dir(
    cfg: &Config,
    dir: &Path,
    name: &OsStr,
    summary: &mut TreeSummary,
) -> Option<OsString> {
    let display = name.to_string_lossy();
    if is_normalized(&display) {
        return None;
    }
    let (new_name, degenerate) = destination_stem(&display);
    if name == OsStr::new(&new_name) {
        return None;
    }
    if degenerate {
        summary.degenerate += 1;
    }
    apply_rename(cfg, dir, name, &new_name, summary)
}

/// Move `dir/from` to `dir/to`; returns the name the entry ended up under.
fn apply_rename(
    cfg: &Config,
    dir: &Path,
    from: &OsStr,
    to: &str,
    summary: &mut TreeSummary,
) -> Option<OsString> {
    let src = dir.join(from);
    let dst = dir.join(to);

    if cfg.dry_run {
        info!(from = %src.display(), to = %dst.display(), "dry-run: would rename");
        if src.is_dir() {
            summary.dirs_renamed += 1;
        }
        return Some(OsString::from(to));
    }

    let is_dir = src.is_dir();
    match safe_move(&src, &dst) {
        Ok(out) => {
            match &out.kind {
                MoveKind::Unchanged => {}
                MoveKind::Renamed => {
                    if is_dir {
                        summary.dirs_renamed += 1;
                    }
                }
                MoveKind::Collision => {
                    summary.collisions += 1;
                    if is_dir {
                        summary.dirs_renamed += 1;
                    }
                }
                MoveKind::Merged(m) => {
                    summary.dirs_merged += 1;
                    summary.collisions += m.renamed;
                    summary.failures += m.failed;
                    summary.merge_leftovers += m.leftovers.len();
                }
            }
            info!(from = %from.to_string_lossy(), to = %out.path.display(), "Normalized name");
            out.path.file_name().map(OsStr::to_os_string)
        }
        Err(e) => {
            summary.failures += 1;
            report_failure(&src, &e);
            None
        }
    }
}

fn report_failure(path: &Path, e: &anyhow::Error) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(typed) = e.downcast_ref::<WebnormError>() {
        error!(
            code = typed.code(),
            kind = typed.kind(),
            %name,
            path = %path.display(),
            error = %typed,
            "Entry skipped"
        );
    } else {
        error!(%name, path = %path.display(), error = %e, "Entry skipped");
    }
}
