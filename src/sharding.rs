//! # Shard dispatch strategies.
//!
//! Subscriptions registered at the same node with the same non-empty shard
//! id form a group, and each visit of that node delivers the datum to
//! exactly one member. [`Sharding`] is the strategy seam:
//!
//! - [`RandomSharding`] picks a member uniformly at random (the default).
//! - [`RoundRobinSharding`] cycles through members in registration order.
//! - [`ShardingFn`] adapts a closure, which is also how tests inject a
//!   deterministic pick.
//!
//! A strategy is configured once per bus and must be safe to call from
//! concurrent publishes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::Rng;

use crate::subscriber::SubscriberRef;

/// Shared handle to a shard dispatch strategy.
pub type ShardingRef<T> = Arc<dyn Sharding<T>>;

/// Picks which member of a shard group receives a datum.
///
/// `group` is never empty and must not be mutated; exactly one member's
/// `write` must be invoked.
pub trait Sharding<T>: Send + Sync {
    fn write(&self, data: &T, group: &[SubscriberRef<T>]);
}

/// Uniformly random member selection.
///
/// Uses the thread-local generator, so concurrent and reentrant publishes
/// never contend on shared RNG state. Tests that need a deterministic pick
/// inject a [`ShardingFn`] instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSharding;

impl RandomSharding {
    pub fn new() -> Self {
        Self
    }
}

impl<T> Sharding<T> for RandomSharding {
    fn write(&self, data: &T, group: &[SubscriberRef<T>]) {
        let idx = rand::rng().random_range(0..group.len());
        group[idx].write(data);
    }
}

/// Rotating member selection.
///
/// Keeps one counter per strategy instance, so the rotation advances per
/// sharded delivery, not per group. With a stable group this hands out
/// data in registration order.
#[derive(Debug, Default)]
pub struct RoundRobinSharding {
    next: AtomicUsize,
}

impl RoundRobinSharding {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Sharding<T> for RoundRobinSharding {
    fn write(&self, data: &T, group: &[SubscriberRef<T>]) {
        let turn = self.next.fetch_add(1, Ordering::Relaxed);
        group[turn % group.len()].write(data);
    }
}

/// Function-backed strategy.
///
/// # Example
/// ```
/// use pathbus::{Sharding, ShardingFn, SubscribeFn, SubscriberRef};
///
/// // Always the first member: handy for deterministic tests.
/// let first = ShardingFn::new(|data: &u32, group: &[SubscriberRef<u32>]| {
///     group[0].write(data);
/// });
///
/// let group: Vec<SubscriberRef<u32>> = vec![SubscribeFn::arc(|_: &u32| {})];
/// first.write(&7, &group);
/// ```
pub struct ShardingFn<F> {
    func: F,
}

impl<F> ShardingFn<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<T, F> Sharding<T> for ShardingFn<F>
where
    F: Fn(&T, &[SubscriberRef<T>]) + Send + Sync,
{
    fn write(&self, data: &T, group: &[SubscriberRef<T>]) {
        (self.func)(data, group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriber::SubscribeFn;
    use std::sync::atomic::AtomicUsize;

    fn counting() -> (SubscriberRef<u8>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let writes = Arc::clone(&count);
        let subscriber = SubscribeFn::arc(move |_: &u8| {
            writes.fetch_add(1, Ordering::SeqCst);
        });
        (subscriber, count)
    }

    #[test]
    fn random_sharding_delivers_to_exactly_one() {
        let (first, c1) = counting();
        let (second, c2) = counting();
        let group = vec![first, second];

        RandomSharding::new().write(&1, &group);

        assert_eq!(c1.load(Ordering::SeqCst) + c2.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn round_robin_cycles_through_the_group() {
        let (first, c1) = counting();
        let (second, c2) = counting();
        let group = vec![first, second];

        let rr = RoundRobinSharding::new();
        for _ in 0..4 {
            rr.write(&1, &group);
        }

        assert_eq!(c1.load(Ordering::SeqCst), 2);
        assert_eq!(c2.load(Ordering::SeqCst), 2);
    }
}
