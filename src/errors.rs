//! Typed error definitions for webnorm.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebnormError {
    #[error("Name '{name}' normalizes to an empty string")]
    NormalizationDegenerate { name: String },

    #[error("{op} '{}': {reason}", path.display())]
    MoveFailed {
        op: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Merged directory could not be removed: {}", dir.display())]
    MergeIncomplete { dir: PathBuf },

    #[error("Root directory invalid or unreadable: {}", .0.display())]
    RootInvalid(PathBuf),

    #[error("Failed to write manifest '{}': {reason}", path.display())]
    ManifestWrite { path: PathBuf, reason: String },
}

impl WebnormError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            WebnormError::NormalizationDegenerate { .. } => 10,
            WebnormError::MoveFailed { .. } => 20,
            WebnormError::MergeIncomplete { .. } => 30,
            WebnormError::RootInvalid(_) => 40,
            WebnormError::ManifestWrite { .. } => 50,
        }
    }

    /// Short machine-friendly kind label.
    pub fn kind(&self) -> &'static str {
        match self {
            WebnormError::NormalizationDegenerate { .. } => "normalization_degenerate",
            WebnormError::MoveFailed { .. } => "move_failed",
            WebnormError::MergeIncomplete { .. } => "merge_incomplete",
            WebnormError::RootInvalid(_) => "root_invalid",
            WebnormError::ManifestWrite { .. } => "manifest_write",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let errs = [
            WebnormError::NormalizationDegenerate { name: "#".into() },
            WebnormError::MoveFailed {
                op: "rename".into(),
                path: PathBuf::from("a"),
                reason: "x".into(),
            },
            WebnormError::MergeIncomplete { dir: PathBuf::from("d") },
            WebnormError::RootInvalid(PathBuf::from("r")),
            WebnormError::ManifestWrite {
                path: PathBuf::from("m.json"),
                reason: "y".into(),
            },
        ];
        let mut codes: Vec<u16> = errs.iter().map(|e| e.code()).collect();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }

    #[test]
    fn move_failed_display_mentions_op_and_path() {
        let e = WebnormError::MoveFailed {
            op: "rename file".into(),
            path: PathBuf::from("/tmp/A.png"),
            reason: "permission denied".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("rename file"));
        assert!(msg.contains("/tmp/A.png"));
        assert!(msg.contains("permission denied"));
    }
}
