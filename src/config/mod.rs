//! Config module (modularized).
//! Provides configuration types, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::path_has_symlink_ancestor;
pub use types::{Config, LogLevel};
pub use validate::validate_and_normalize;
pub use xml::load_config_from_xml_path;

/// Defaults shared across submodules.
pub const ROOT_DEFAULT: &str = "figurinhas";
pub const OUTPUT_DEFAULT: &str = "figurinhas.json";
pub const EXTENSION_DEFAULT: &str = "png";
