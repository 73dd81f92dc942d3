//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --root takes precedence over the positional ROOT.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, LogLevel};

/// Normalize an image tree into web-safe names and write a JSON manifest.
/// CLI flags override config values (which are loaded from XML when --config is given).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Normalize image file and directory names, then write a JSON manifest"
)]
pub struct Args {
    /// Tree to process (defaults to ./figurinhas).
    #[arg(value_name = "ROOT", value_hint = ValueHint::DirPath)]
    pub root_pos: Option<PathBuf>,

    /// Tree to process; overrides the positional ROOT.
    #[arg(long = "root", short = 'r', value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Prefix prepended to each image path in the manifest.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Manifest file to write.
    #[arg(long, short = 'o', value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Image extension to process (without the dot).
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Also rename and list entries whose name starts with '.'.
    #[arg(
        long,
        help = "Also process hidden entries (default: skipped; normalizing strips the leading '.')"
    )]
    pub include_hidden: bool,

    /// Dry-run: log planned renames but do not modify the filesystem.
    #[arg(long, help = "Show what would be renamed, but do not modify files/directories")]
    pub dry_run: bool,

    /// Do not rename anything; only write the manifest.
    #[arg(long)]
    pub skip_normalize: bool,

    /// Do not write the manifest; only rename.
    #[arg(long)]
    pub skip_manifest: bool,

    /// Read settings from this XML file before applying flags.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective root: `--root` if provided, else positional ROOT.
    pub fn resolved_root(&self) -> Option<PathBuf> {
        self.root
            .as_deref()
            .or(self.root_pos.as_deref())
            .map(Self::sanitize_path)
    }

    fn sanitize_path(p: &Path) -> PathBuf {
        Self::sanitize_str(&p.to_string_lossy())
    }

    fn sanitize_str(s: &str) -> PathBuf {
        // Shells on Windows may hand quotes through verbatim.
        let trimmed = s.trim();
        let mut inner = if trimmed.len() >= 2
            && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
                || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
        {
            trimmed[1..trimmed.len() - 1].to_string()
        } else {
            trimmed.trim_matches(|c| c == '\'' || c == '"').to_string()
        };

        // One trailing separator, never the root itself.
        if (inner.ends_with('\\') || inner.ends_with('/')) && inner.len() > 1 {
            inner.pop();
        }

        PathBuf::from(inner)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(root) = self.resolved_root() {
            cfg.root = root;
        }
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(out) = &self.output {
            cfg.output = Self::sanitize_path(out);
        }
        if let Some(ext) = &self.extension {
            cfg.extension = ext.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(Self::sanitize_path(lf));
        }
        if self.include_hidden {
            cfg.include_hidden = true;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.skip_normalize {
            cfg.normalize = false;
        }
        if self.skip_manifest {
            cfg.manifest = false;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
