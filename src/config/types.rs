//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{EXTENSION_DEFAULT, OUTPUT_DEFAULT, ROOT_DEFAULT};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration used by the normalizer and manifest builder.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tree to normalize and list
    pub root: PathBuf,
    /// Prefix prepended to each relative image path in the manifest
    pub base_url: String,
    /// Manifest file to write
    pub output: PathBuf,
    /// Image extension (lowercase, without dot)
    pub extension: String,
    /// Also process entries whose name starts with '.'
    pub include_hidden: bool,
    /// If true, log planned renames but do not modify the filesystem
    pub dry_run: bool,
    /// Run the rename pass
    pub normalize: bool,
    /// Write the manifest
    pub manifest: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(ROOT_DEFAULT),
            base_url: String::new(),
            output: PathBuf::from(OUTPUT_DEFAULT),
            extension: EXTENSION_DEFAULT.to_string(),
            include_hidden: false,
            dry_run: false,
            normalize: true,
            manifest: true,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Construct a Config for `root` and `base_url`; other fields use defaults.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// True if `file_name` carries the configured image extension (case-insensitive).
    pub fn matches_extension(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| {
                !stem.is_empty() && ext.eq_ignore_ascii_case(&self.extension)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parse_aliases() {
        assert_eq!(LogLevel::parse("QUIET"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!("normal".parse::<LogLevel>().unwrap(), LogLevel::Normal);
        assert_eq!(LogLevel::Info.to_string(), "info");
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let cfg = Config::default();
        assert!(cfg.matches_extension("Foo.PNG"));
        assert!(cfg.matches_extension("a.b.png"));
        assert!(!cfg.matches_extension("foo.jpg"));
        assert!(!cfg.matches_extension("png"));
        assert!(!cfg.matches_extension(".png"));
    }
}
