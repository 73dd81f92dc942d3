//! Image manifest.
//!
//! Walks the (already normalized) tree read-only and describes every image as
//! a JSON record for the web front end. File names may carry display markers:
//!
//! - a stem ending in `#` hides the image from the manifest;
//! - a trailing `!<digits>` pins the image, lower numbers first;
//! - a `~` anywhere marks the image as premium.

use anyhow::Result;
use chrono::{Local, SecondsFormat};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::errors::WebnormError;
use crate::fs_ops::TEMP_PREFIX;
use crate::platform::atomic_write;

/// One image in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub url: String,
    pub title: String,
    /// Modification time, Unix seconds.
    pub recent: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promote: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub premium: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub last_modified: String,
    pub images: Vec<ImageRecord>,
}

/// Collect every image under `cfg.root` into a sorted manifest.
///
/// Unreadable entries are logged and skipped; only an unreadable root fails.
pub fn build_manifest(cfg: &Config) -> Result<Manifest> {
    if !cfg.root.is_dir() {
        return Err(WebnormError::RootInvalid(cfg.root.clone()).into());
    }

    let include_hidden = cfg.include_hidden;
    let walker = WalkDir::new(&cfg.root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || include_hidden || !is_hidden(e));

    let mut images = Vec::new();
    for item in walker {
        let entry = match item {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || is_staging_name(&entry) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !cfg.matches_extension(&name) {
            continue;
        }
        if let Some(record) = image_record(cfg, &entry) {
            images.push(record);
        }
    }

    sort_images(&mut images);
    info!(root = %cfg.root.display(), images = images.len(), "Manifest built");
    Ok(Manifest {
        last_modified: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        images,
    })
}

/// Serialize `manifest` with four-space indentation and replace `path` atomically.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let bytes = to_pretty_json(manifest).map_err(|e| manifest_error(path, &e))?;
    atomic_write(path, &bytes).map_err(|e| manifest_error(path, &e))?;
    info!(path = %path.display(), images = manifest.images.len(), "Manifest written");
    Ok(())
}

fn to_pretty_json(manifest: &Manifest) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    manifest.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

fn manifest_error(path: &Path, e: &dyn std::fmt::Display) -> anyhow::Error {
    WebnormError::ManifestWrite {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    }
    .into()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_staging_name(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX)
}

fn image_record(cfg: &Config, entry: &DirEntry) -> Option<ImageRecord> {
    let name = entry.file_name().to_string_lossy();
    let (stem, _) = name.rsplit_once('.')?;
    if stem.ends_with('#') {
        debug!(path = %entry.path().display(), "hidden by marker");
        return None;
    }

    let (stem, promote) = split_promote(stem);
    let premium = stem.contains('~');
    let rel = entry.path().strip_prefix(&cfg.root).ok()?;

    Some(ImageRecord {
        url: format!("{}{}", cfg.base_url, url_path(rel)),
        title: display_title(stem),
        recent: modified_secs(entry),
        promote,
        premium,
    })
}

/// Split a trailing `!<digits>` off `stem`.
fn split_promote(stem: &str) -> (&str, Option<u32>) {
    if let Some((rest, digits)) = stem.rsplit_once('!')
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && let Ok(n) = digits.parse()
    {
        return (rest, Some(n));
    }
    (stem, None)
}

fn display_title(stem: &str) -> String {
    stem.replace(['_', '~'], " ").trim().to_string()
}

fn url_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn modified_secs(entry: &DirEntry) -> i64 {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs() as i64)
}

/// Promoted images first (ascending), then newest first. Stable.
fn sort_images(images: &mut [ImageRecord]) {
    images.sort_by(|a, b| match (a.promote, b.promote) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.recent.cmp(&a.recent),
    });
}
