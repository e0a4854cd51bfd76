//! Depth-first publish traversal.
//!
//! One [`Walk`] exists per publish. It starts at the root, and at every
//! node it visits it snapshots the node's shard buckets, delivers the datum
//! (individually for the unsharded bucket, through the sharding strategy
//! for every other), then asks the traverser for the branches to descend
//! into. A per-publish history keyed by path guarantees each node is
//! delivered to at most once, while the walk itself continues through
//! revisited nodes so that branches converging from different directions
//! still reach their subtrees.
//!
//! The trie is read in one of two ways. In the default mode the caller
//! already holds the reader lock and the walk borrows the root directly.
//! In no-lock mode the walk takes the lock only long enough to snapshot
//! each node, so subscriber code runs with no lock held and may re-enter
//! the bus.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::node::Node;
use crate::sharding::Sharding;
use crate::subscriber::SubscriberRef;
use crate::traverser::{Branch, Traverse};

type ShardGroups<T> = Vec<(String, Vec<SubscriberRef<T>>)>;

enum Trie<'a, T> {
    /// The publish holds the reader lock for its whole duration.
    Held(&'a Node<T>),
    /// Per-node snapshots; the lock is released before delivery.
    Shared(&'a RwLock<Node<T>>),
}

impl<T> Trie<'_, T> {
    fn shard_groups(&self, path: &[String]) -> Option<ShardGroups<T>> {
        match self {
            Trie::Held(root) => root.descend(path).map(collect_groups),
            Trie::Shared(lock) => {
                let root = lock.read().unwrap_or_else(PoisonError::into_inner);
                root.descend(path).map(collect_groups)
            }
        }
    }
}

fn collect_groups<T>(node: &Node<T>) -> ShardGroups<T> {
    let mut groups = Vec::new();
    node.for_each_bucket(|shard_id, records| {
        groups.push((
            shard_id.to_string(),
            records.iter().map(|r| Arc::clone(&r.subscriber)).collect(),
        ));
    });
    groups
}

pub(crate) struct Walk<'a, T> {
    trie: Trie<'a, T>,
    sharding: &'a dyn Sharding<T>,
    data: &'a T,
    seen: HashSet<Vec<String>>,
}

impl<'a, T> Walk<'a, T> {
    pub(crate) fn held(root: &'a Node<T>, sharding: &'a dyn Sharding<T>, data: &'a T) -> Self {
        Self {
            trie: Trie::Held(root),
            sharding,
            data,
            seen: HashSet::new(),
        }
    }

    pub(crate) fn shared(
        root: &'a RwLock<Node<T>>,
        sharding: &'a dyn Sharding<T>,
        data: &'a T,
    ) -> Self {
        Self {
            trie: Trie::Shared(root),
            sharding,
            data,
            seen: HashSet::new(),
        }
    }

    pub(crate) fn run(mut self, traverser: &dyn Traverse<T>) {
        let mut path = Vec::new();
        self.step(traverser, &mut path);
    }

    fn step(&mut self, traverser: &dyn Traverse<T>, path: &mut Vec<String>) {
        // A path with no node prunes this branch of the walk. This also
        // covers children removed after the publish began in no-lock mode.
        let Some(groups) = self.trie.shard_groups(path) else {
            return;
        };

        if !self.seen.contains(path.as_slice()) {
            for (shard_id, group) in &groups {
                if shard_id.is_empty() {
                    for subscriber in group {
                        subscriber.write(self.data);
                    }
                } else {
                    self.sharding.write(self.data, group);
                }
            }
            self.seen.insert(path.clone());
        }

        for branch in traverser.traverse(self.data, path) {
            let Branch {
                label,
                traverser: replacement,
            } = branch;

            path.push(label);
            match replacement {
                Some(next) => self.step(next.as_ref(), path),
                None => self.step(traverser, path),
            }
            path.pop();
        }
    }
}
