//! Core library for `webnorm`.
//!
//! Renames an image tree into web-safe names without losing or overwriting
//! anything, then describes the tree as a JSON manifest. The binary is a thin
//! wrapper: a Config with sensible defaults, a validation step, and the two
//! passes exposed here.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod manifest;
pub mod normalize;
pub mod output;
pub mod platform;
pub mod resume;
pub mod tree;

pub use config::{
    load_config_from_xml_path, path_has_symlink_ancestor, validate_and_normalize, Config,
    LogLevel,
};
pub use errors::WebnormError;
pub use fs_ops::{merge_dirs, resolve_collision, safe_move, MergeOutcome, MoveKind, MoveOutcome};
pub use manifest::{build_manifest, write_manifest, ImageRecord, Manifest};
pub use normalize::normalize;
pub use tree::{normalize_tree, TreeSummary};
