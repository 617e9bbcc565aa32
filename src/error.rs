//! Errors surfaced by the index.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The only way a [`Tree`][crate::Tree] operation can fail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The allocator could not provide memory for a new node. The tree is left exactly as it
    /// was before the call.
    #[error("failed to allocate a {size} byte tree node")]
    OutOfMemory {
        /// Size of the allocation that was refused.
        size: usize,
    },
}
