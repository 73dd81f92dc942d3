//! XML configuration support.
//! - Loads settings from an explicitly named config.xml (quick_xml).
//! - Unknown fields are rejected to surface misconfigurations early.
//!
//! Notes:
//! - This module only reads the config file; validation happens elsewhere.
//! - Values are trimmed; empty values count as unset.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "root")]
    root: Option<String>,
    #[serde(rename = "base_url")]
    base_url: Option<String>,
    #[serde(rename = "output")]
    output: Option<String>,
    #[serde(rename = "extension")]
    extension: Option<String>,
    #[serde(rename = "include_hidden", default, deserialize_with = "de_bool_trimmed_opt")]
    include_hidden: Option<bool>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
}

// Custom deserializer that trims surrounding whitespace for optional bool
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }))
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config, starting from defaults.
fn xml_to_config(parsed: XmlConfig) -> Config {
    let mut cfg = Config::default();

    if let Some(s) = trimmed(parsed.root.as_deref()) {
        cfg.root = PathBuf::from(s);
    }
    if let Some(s) = trimmed(parsed.base_url.as_deref()) {
        cfg.base_url = s.to_string();
    }
    if let Some(s) = trimmed(parsed.output.as_deref()) {
        cfg.output = PathBuf::from(s);
    }
    if let Some(s) = trimmed(parsed.extension.as_deref()) {
        cfg.extension = s.to_string();
    }
    if let Some(s) = trimmed(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = trimmed(parsed.log_level.as_deref()) {
        match s.parse::<LogLevel>() {
            Ok(level) => cfg.log_level = level,
            Err(e) => debug!("ignoring log_level in config: {e}"),
        }
    }
    if let Some(b) = parsed.include_hidden {
        cfg.include_hidden = b;
    }

    cfg
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(xml_to_config(parsed))
}
