//! # Error types for registry operations.
//!
//! The error surface is deliberately narrow. Publishing has no error
//! channel at all: subscriber and traverser failures propagate to the
//! publisher as panics, and a stale unsubscribe handle is a silent no-op.
//! The only operation that can reject its input is `subscribe`.

use thiserror::Error;

/// # Errors produced while registering a subscription.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SubscribeError {
    /// A path label was the empty string. The empty string is reserved as
    /// the no-shard marker and never names a trie node.
    #[error("subscription path contains an empty label at position {position}")]
    EmptyLabel {
        /// Zero-based index of the offending label in the path.
        position: usize,
    },
}

impl SubscribeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscribeError::EmptyLabel { .. } => "subscribe_empty_label",
        }
    }
}
