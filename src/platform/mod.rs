//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

mod temp;
#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{atomic_write, open_log_file_secure_append};

#[cfg(not(unix))]
pub use windows::{atomic_write, open_log_file_secure_append};
