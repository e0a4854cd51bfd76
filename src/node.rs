//! Subscription trie node.
//!
//! Each node owns its children by label and its subscriptions bucketed by
//! shard id. A second map from subscription id to shard id makes removal a
//! pair of O(1) lookups. Nodes never outlive their last subscription or
//! child: the registry prunes empty nodes on the way back up from an
//! unsubscribe.

use std::collections::HashMap;

use rand::Rng;

use crate::subscriber::SubscriberRef;

/// One registered subscription: the engine-assigned id plus the shared
/// subscriber handle.
pub(crate) struct Record<T> {
    pub(crate) id: u64,
    pub(crate) subscriber: SubscriberRef<T>,
}

pub(crate) struct Node<T> {
    children: HashMap<String, Node<T>>,
    bucketed: HashMap<String, Vec<Record<T>>>,
    index: HashMap<u64, String>,
}

impl<T> Node<T> {
    pub(crate) fn new() -> Self {
        Self {
            children: HashMap::new(),
            bucketed: HashMap::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the child under `label`, creating and linking it first if it
    /// does not exist yet.
    pub(crate) fn add_child(&mut self, label: &str) -> &mut Node<T> {
        self.children
            .entry(label.to_string())
            .or_insert_with(Node::new)
    }

    pub(crate) fn fetch_child(&self, label: &str) -> Option<&Node<T>> {
        self.children.get(label)
    }

    pub(crate) fn fetch_child_mut(&mut self, label: &str) -> Option<&mut Node<T>> {
        self.children.get_mut(label)
    }

    /// Unlinks the child under `label`. The caller has already verified the
    /// child holds neither children nor subscriptions.
    pub(crate) fn delete_child(&mut self, label: &str) {
        self.children.remove(label);
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn subscription_count(&self) -> usize {
        self.index.len()
    }

    /// Follows `path` downward, one child per label. `None` means some step
    /// of the path has no node, which every caller treats as "nothing
    /// there".
    pub(crate) fn descend(&self, path: &[String]) -> Option<&Node<T>> {
        path.iter().try_fold(self, |node, label| node.fetch_child(label))
    }

    /// Registers `subscriber` under `shard_id` and returns the fresh id.
    ///
    /// Ids are drawn uniformly from the 63-bit space; a draw that collides
    /// with a live id on this node is re-drawn.
    pub(crate) fn add_subscription(&mut self, subscriber: SubscriberRef<T>, shard_id: &str) -> u64 {
        let mut rng = rand::rng();
        let id = loop {
            let candidate = rng.random_range(0..1u64 << 63);
            if !self.index.contains_key(&candidate) {
                break candidate;
            }
        };

        self.index.insert(id, shard_id.to_string());
        self.bucketed
            .entry(shard_id.to_string())
            .or_default()
            .push(Record { id, subscriber });
        id
    }

    /// Removes the subscription with `id`. Unknown ids are a silent no-op.
    /// A bucket emptied by the removal is dropped entirely so that bucket
    /// iteration never sees an empty group.
    pub(crate) fn delete_subscription(&mut self, id: u64) {
        let Some(shard_id) = self.index.remove(&id) else {
            return;
        };

        if let Some(records) = self.bucketed.get_mut(&shard_id) {
            records.retain(|record| record.id != id);
            if records.is_empty() {
                self.bucketed.remove(&shard_id);
            }
        }
    }

    /// Visits every shard bucket on this node. Bucket order is unspecified;
    /// record order within a bucket is insertion order.
    pub(crate) fn for_each_bucket(&self, mut visit: impl FnMut(&str, &[Record<T>])) {
        for (shard_id, records) in &self.bucketed {
            visit(shard_id, records);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriber::SubscribeFn;

    fn stub() -> SubscriberRef<u8> {
        SubscribeFn::arc(|_: &u8| {})
    }

    fn path(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn add_child_reuses_existing_nodes() {
        let mut node: Node<u8> = Node::new();
        node.add_child("a").add_subscription(stub(), "");
        node.add_child("a");

        assert_eq!(node.child_count(), 1);
        assert_eq!(node.fetch_child("a").unwrap().subscription_count(), 1);
    }

    #[test]
    fn descend_follows_the_path() {
        let mut node: Node<u8> = Node::new();
        node.add_child("a").add_child("b");

        assert!(node.descend(&path(&["a", "b"])).is_some());
        assert!(node.descend(&path(&["a", "zz"])).is_none());
        assert!(node.descend(&[]).is_some());
    }

    #[test]
    fn subscription_ids_are_unique_and_indexed() {
        let mut node: Node<u8> = Node::new();
        let first = node.add_subscription(stub(), "");
        let second = node.add_subscription(stub(), "");
        let third = node.add_subscription(stub(), "workers");

        assert_ne!(first, second);
        assert_eq!(node.subscription_count(), 3);

        let mut seen = Vec::new();
        node.for_each_bucket(|shard_id, records| {
            seen.push((shard_id.to_string(), records.iter().map(|r| r.id).collect::<Vec<_>>()));
        });
        seen.sort();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (String::new(), vec![first, second]));
        assert_eq!(seen[1], ("workers".to_string(), vec![third]));
    }

    #[test]
    fn delete_subscription_drops_emptied_buckets() {
        let mut node: Node<u8> = Node::new();
        let id = node.add_subscription(stub(), "g");

        node.delete_subscription(id);
        assert_eq!(node.subscription_count(), 0);

        let mut buckets = 0;
        node.for_each_bucket(|_, _| buckets += 1);
        assert_eq!(buckets, 0);

        // Unknown id after the fact.
        node.delete_subscription(id);
    }
}
