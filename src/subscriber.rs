//! # Subscriber capability and function-backed implementation.
//!
//! This module defines the [`Subscribe`] trait, the single capability a
//! receiver of published data must provide, and a convenient closure-backed
//! implementation [`SubscribeFn`]. The common handle type is
//! [`SubscriberRef`], an `Arc<dyn Subscribe<T>>` shared between the caller
//! and the bus.
//!
//! Delivery is synchronous: `write` runs on the publishing thread, inside
//! the publish critical section in the default locking mode. Subscribers
//! that need to do slow work should hand the datum off (see the `queue`
//! feature) rather than block the publisher.

use std::sync::Arc;

/// Shared handle to a subscriber object.
///
/// This is the type the bus stores and the type `subscribe` accepts.
pub type SubscriberRef<T> = Arc<dyn Subscribe<T>>;

/// # Receiver of published data.
///
/// The bus treats implementors as opaque: it never inspects the subscriber,
/// never compares two subscribers for equality, and identifies a
/// registration only by the id minted when it was added.
///
/// # Example
/// ```
/// use pathbus::{Subscribe, SubscribeFn, SubscriberRef};
///
/// let printer: SubscriberRef<String> = SubscribeFn::arc(|data: &String| {
///     let _ = data;
/// });
/// printer.write(&"hello".to_string());
/// ```
pub trait Subscribe<T>: Send + Sync {
    /// Receives one published datum.
    ///
    /// Runs on the publisher's thread. Errors have no channel back to the
    /// bus; implementations are expected to handle their own failures, and
    /// a panic propagates to the publisher.
    fn write(&self, data: &T);
}

/// Function-backed subscriber.
///
/// Wraps a `Fn(&T)` closure. Use [`SubscribeFn::arc`] for a one-liner that
/// returns a [`SubscriberRef`].
pub struct SubscribeFn<F> {
    func: F,
}

impl<F> SubscribeFn<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }

    /// Creates the subscriber and returns it as a shared handle.
    pub fn arc<T>(func: F) -> SubscriberRef<T>
    where
        T: 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        Arc::new(Self::new(func))
    }
}

impl<T, F> Subscribe<T> for SubscribeFn<F>
where
    F: Fn(&T) + Send + Sync,
{
    fn write(&self, data: &T) {
        (self.func)(data)
    }
}
