//! # Bus configuration and subscription options.
//!
//! [`Config`] controls how the bus guards the subscription trie;
//! [`SubscribeOptions`] places one subscription in it.
//!
//! # Example
//! ```
//! use pathbus::{Config, SubscribeOptions};
//!
//! let mut cfg = Config::default();
//! cfg.no_lock = true;
//!
//! let opts = SubscribeOptions::at(["metrics", "cpu"]).shard("workers");
//! assert_eq!(opts.path.len(), 2);
//! assert_eq!(opts.shard_id, "workers");
//! ```

/// Construction-time configuration for a bus.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// Drops the publish-wide reader lock in favor of per-node snapshots,
    /// so no lock is held while subscriber code runs. Required when a
    /// subscriber re-enters the bus from `write` (subscribing while being
    /// published to); in exchange the caller owns any coordination across
    /// publishes. Default: `false`, the reader/writer discipline where a
    /// publish and a subscription never overlap.
    pub no_lock: bool,
}

/// Placement of one subscription: where in the trie it lives and whether it
/// shares a shard group there.
#[derive(Clone, Debug, Default)]
pub struct SubscribeOptions {
    /// Trie path the subscription is interested in. Empty means the root,
    /// which every publish visits first. Labels must be non-empty.
    pub path: Vec<String>,
    /// Shard group id at that node. The empty string (default) means the
    /// subscription is delivered to individually; any other value groups
    /// it with its peers so that exactly one of them receives each datum.
    pub shard_id: String,
}

impl SubscribeOptions {
    /// Options for a subscription at `path`, delivered individually.
    pub fn at(path: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            shard_id: String::new(),
        }
    }

    /// Joins the shard group `shard_id` at this path.
    pub fn shard(mut self, shard_id: impl Into<String>) -> Self {
        self.shard_id = shard_id.into();
        self
    }
}
