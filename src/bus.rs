//! # The subscription registry.
//!
//! [`Bus`] owns the subscription trie and exposes the two operations of the
//! engine:
//!
//! - [`Bus::subscribe`] walks the trie along the subscription's path,
//!   creating nodes on demand, and returns an [`Unsubscriber`] handle.
//! - [`Bus::publish`] walks the trie under the guidance of a caller-supplied
//!   traverser and delivers the datum to every node it reaches.
//!
//! A `Bus` is a cheap clone over shared state, so it can be handed to
//! publishers, subscribers and the code that tears subscriptions down
//! without lifetime gymnastics. Under the default configuration,
//! subscription and unsubscription take the writer side of one
//! reader/writer lock and publishes take the reader side, so any number of
//! publishes proceed concurrently while structural edits are serialized
//! against all of them.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::config::{Config, SubscribeOptions};
use crate::error::SubscribeError;
use crate::node::Node;
use crate::publish::Walk;
use crate::sharding::{RandomSharding, Sharding, ShardingRef};
use crate::subscriber::SubscriberRef;
use crate::traverser::Traverse;

/// Path-routed publish/subscribe registry.
///
/// Cloning shares the underlying trie; the trie lives until the last clone
/// is dropped. Handles returned by [`Bus::subscribe`] hold only a weak
/// reference and never keep the bus alive.
pub struct Bus<T> {
    inner: Arc<Shared<T>>,
}

struct Shared<T> {
    root: RwLock<Node<T>>,
    sharding: ShardingRef<T>,
    no_lock: bool,
}

impl<T> Clone for Bus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Bus<T> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<T: 'static> Bus<T> {
    /// Creates a bus with the default uniformly random shard dispatch.
    pub fn new(cfg: Config) -> Self {
        Self::with_sharding(cfg, RandomSharding::new())
    }

    /// Creates a bus with a caller-supplied shard dispatch strategy.
    pub fn with_sharding(cfg: Config, sharding: impl Sharding<T> + 'static) -> Self {
        Self {
            inner: Arc::new(Shared {
                root: RwLock::new(Node::new()),
                sharding: Arc::new(sharding),
                no_lock: cfg.no_lock,
            }),
        }
    }

    /// Registers `subscriber` at the node named by `opts.path`, creating
    /// the node if needed.
    ///
    /// Registering the same subscriber again, even with the same path and
    /// shard id, creates a distinct subscription: the bus never compares
    /// subscribers, only the ids it mints.
    ///
    /// # Errors
    /// Rejects paths containing an empty label; the empty string is not a
    /// label.
    pub fn subscribe(
        &self,
        subscriber: SubscriberRef<T>,
        opts: SubscribeOptions,
    ) -> Result<Unsubscriber<T>, SubscribeError> {
        if let Some(position) = opts.path.iter().position(|label| label.is_empty()) {
            return Err(SubscribeError::EmptyLabel { position });
        }

        let id = {
            let mut root = self.inner.root.write().unwrap_or_else(PoisonError::into_inner);
            let target = opts
                .path
                .iter()
                .fold(&mut *root, |node, label| node.add_child(label));
            target.add_subscription(subscriber, &opts.shard_id)
        };

        Ok(Unsubscriber {
            bus: Arc::downgrade(&self.inner),
            path: opts.path.into(),
            id,
        })
    }

    /// Routes `data` through the trie as directed by `traverser` and
    /// delivers it to the subscriptions of every node the walk reaches,
    /// each at most once.
    ///
    /// Delivery is synchronous on the calling thread. In the default mode
    /// the whole traversal runs under the reader lock, so subscribers must
    /// not call back into the bus; configure [`Config::no_lock`] when they
    /// have to.
    pub fn publish(&self, data: &T, traverser: &dyn Traverse<T>) {
        let sharding = self.inner.sharding.as_ref();
        if self.inner.no_lock {
            Walk::shared(&self.inner.root, sharding, data).run(traverser);
        } else {
            let root = self.inner.root.read().unwrap_or_else(PoisonError::into_inner);
            Walk::held(&root, sharding, data).run(traverser);
        }
    }
}

/// Handle that removes one subscription.
///
/// Invoking it more than once, or after the bus itself is gone, is a
/// silent no-op. Dropping the handle without invoking it leaves the
/// subscription in place.
#[derive(Debug)]
pub struct Unsubscriber<T> {
    bus: Weak<Shared<T>>,
    path: Arc<[String]>,
    id: u64,
}

impl<T> Clone for Unsubscriber<T> {
    fn clone(&self) -> Self {
        Self {
            bus: Weak::clone(&self.bus),
            path: Arc::clone(&self.path),
            id: self.id,
        }
    }
}

impl<T> Unsubscriber<T> {
    /// Removes the subscription and prunes any nodes left empty along its
    /// path, bottom-up.
    pub fn unsubscribe(&self) {
        let Some(shared) = self.bus.upgrade() else {
            return;
        };

        let mut root = shared.root.write().unwrap_or_else(PoisonError::into_inner);
        prune(&mut root, &self.path, self.id);
    }
}

/// Descends to the subscription's node, deletes the record there, and on
/// the way back up unlinks every child left with neither children nor
/// subscriptions. A child already pruned by an earlier call simply ends
/// the descent.
fn prune<T>(node: &mut Node<T>, path: &[String], id: u64) {
    let Some((label, rest)) = path.split_first() else {
        node.delete_subscription(id);
        return;
    };

    let emptied = match node.fetch_child_mut(label) {
        None => return,
        Some(child) => {
            prune(child, rest, id);
            child.child_count() == 0 && child.subscription_count() == 0
        }
    };

    if emptied {
        node.delete_child(label);
    }
}
