use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix of the hidden staging names used for case-only renames.
pub(crate) const TEMP_PREFIX: &str = ".webnorm.";
pub(crate) const TEMP_SUFFIX: &str = ".tmp";
/// Suffix of the sidecar file holding a target too long to embed in the staging name.
pub(crate) const TARGET_SUFFIX: &str = ".target";

static SEQ: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling of `path` that does not exist yet, recording `target` so an
/// interrupted run can finish the rename later.
/// Pattern: .webnorm.<pid>.<nanos>.<seq>.<target>.tmp
///
/// Targets too long to embed yield `.webnorm.<pid>.<nanos>.<seq>.tmp`; the caller
/// then records the target with [`write_target_sidecar`].
pub(crate) fn unique_temp_path(path: &Path, target: &OsStr) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let target = target.to_string_lossy();
    loop {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        let mut name = format!("{TEMP_PREFIX}{pid}.{nanos}.{seq}.{target}{TEMP_SUFFIX}");
        if name.len() > 240 {
            name = format!("{TEMP_PREFIX}{pid}.{nanos}.{seq}{TEMP_SUFFIX}");
        }
        let candidate = dir.join(name);
        if !path_occupied(&candidate) {
            return candidate;
        }
    }
}

/// Target name recorded in a staging name, if any.
pub(crate) fn staged_target(name: &OsStr) -> Option<String> {
    let name = name.to_str()?;
    let inner = name.strip_prefix(TEMP_PREFIX)?.strip_suffix(TEMP_SUFFIX)?;
    let mut parts = inner.splitn(4, '.');
    for _ in 0..3 {
        parts.next()?.parse::<u128>().ok()?;
    }
    parts.next().filter(|t| !t.is_empty()).map(str::to_string)
}

/// True if anything (including a dangling symlink) sits at `path`.
pub(crate) fn path_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// True if `path` is a real directory (symlinks are not followed).
pub(crate) fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_dir())
        .unwrap_or(false)
}

/// Two paths that differ only by letter case.
///
/// Case-insensitive filesystems alias such paths, so a direct rename between
/// them is either a no-op or a self-collision.
pub(crate) fn differs_only_by_case(a: &Path, b: &Path) -> bool {
    if a == b {
        return false;
    }
    let la = a.to_string_lossy().to_lowercase();
    let lb = b.to_string_lossy().to_lowercase();
    la == lb
}

/// Sidecar path for a staging name: `.webnorm.<ids>.tmp` -> `.webnorm.<ids>.target`.
pub(crate) fn target_sidecar(tmp: &Path) -> Option<PathBuf> {
    let name = tmp.file_name()?.to_str()?;
    let base = name.strip_suffix(TEMP_SUFFIX)?;
    Some(tmp.with_file_name(format!("{base}{TARGET_SUFFIX}")))
}

/// Durably record `target` next to the staging entry `tmp`.
pub(crate) fn write_target_sidecar(tmp: &Path, target: &OsStr) -> io::Result<Option<PathBuf>> {
    let Some(sidecar) = target_sidecar(tmp) else {
        return Ok(None);
    };
    let mut f = fs::File::create(&sidecar)?;
    f.write_all(target.to_string_lossy().as_bytes())?;
    f.sync_all()?;
    Ok(Some(sidecar))
}

/// Target for the staging entry `tmp`: embedded in its name, else read from its sidecar.
pub(crate) fn recorded_target(tmp: &Path) -> Option<String> {
    if let Some(t) = tmp.file_name().and_then(staged_target) {
        return Some(t);
    }
    let sidecar = target_sidecar(tmp)?;
    let text = fs::read_to_string(sidecar).ok()?;
    let t = text.trim();
    (!t.is_empty() && !t.contains(['/', '\\'])).then(|| t.to_string())
}

#[cfg(unix)]
pub(crate) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = fs::File::open(dir)?;
    f.sync_all()
}

#[cfg(not(unix))]
pub(crate) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
