//! I/O helper utilities.
//!
//! Turns a raw io::Error into `WebnormError::MoveFailed` carrying the failed
//! operation, the path involved and a platform-aware hint.
//!
//! Usage:
//!   fs::rename(src, dst).map_err(io_error_with_help("rename file", src))?;

use std::io;
use std::path::Path;

use crate::errors::WebnormError;

/// Describe `e` with platform-aware hints.
fn describe(e: &io::Error) -> String {
    let mut msg = e.to_string();

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" (permission denied; check ownership and write permissions)");
                }
                libc::EXDEV => {
                    msg.push_str(" (cross-filesystem; rename not possible inside this tree)");
                }
                libc::EBUSY => {
                    msg.push_str(" (resource busy; ensure no other process is using it)");
                }
                libc::ENOENT => {
                    msg.push_str(" (path not found; it may have been moved during the run)");
                }
                libc::EEXIST | libc::ENOTEMPTY => {
                    msg.push_str(" (destination not free)");
                }
                libc::EROFS => {
                    msg.push_str(" (read-only filesystem)");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" (filename or path too long; shorten path segments)");
                }
                libc::ESTALE => {
                    msg.push_str(" (stale file handle; remount or retry)");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" (access denied; check permissions)"), // ERROR_ACCESS_DENIED
                // ERROR_NOT_SAME_DEVICE
                17 => msg.push_str(" (not same device; cross-filesystem move)"),
                // ERROR_SHARING_VIOLATION
                32 => msg.push_str(" (sharing violation; file is in use)"),
                2 | 3 => msg.push_str(" (path not found)"),
                80 | 183 => msg.push_str(" (destination not free)"), // FILE_EXISTS / ALREADY_EXISTS
                206 => msg.push_str(" (filename or path too long)"), // ERROR_FILENAME_EXCED_RANGE
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {code}]"));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" (permission denied; check ownership and write permissions)");
            }
            io::ErrorKind::NotFound => {
                msg.push_str(" (path not found)");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str(" (destination not free)");
            }
            _ => {}
        }
    }

    msg
}

/// Returns a closure suitable for `.map_err(...)` that converts
/// io::Error -> anyhow::Error wrapping `WebnormError::MoveFailed`.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| {
        anyhow::Error::new(WebnormError::MoveFailed {
            op: op.to_string(),
            path: path.to_path_buf(),
            reason: describe(&e),
        })
    }
}
