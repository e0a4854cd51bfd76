//! # QueueSubscriber: non-blocking hand-off out of the publish path.
//!
//! Delivery runs synchronously on the publisher's thread, inside the
//! publish critical section in the default locking mode. A slow consumer
//! there stalls every publisher. [`QueueSubscriber`] decouples the two: its
//! `write` clones the datum into a bounded queue and returns immediately,
//! and a dedicated worker task feeds the [`Drain`] at its own pace.
//!
//! ## What it guarantees
//! - `write` never blocks the publisher.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside the drain are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - No delivery when the queue is full: the datum is dropped for this
//!   subscriber only and the drop is reported on stderr.
//!
//! ## Diagram
//! ```text
//!    write(&T) ──► [bounded queue] ──► worker task ──► drain.on_data()
//!                                               └────► panic caught & isolated
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::subscriber::{Subscribe, SubscriberRef};

/// Consumer side of a [`QueueSubscriber`].
///
/// Runs on the worker task, never on the publisher. Slow processing only
/// backs up this subscriber's own queue.
#[async_trait]
pub trait Drain<T>: Send + Sync + 'static {
    /// Processes one queued datum. Panics are caught and reported; other
    /// failures are the drain's own business.
    async fn on_data(&self, data: &T);

    /// Name used when reporting drops and panics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of the queue in front of this drain.
    fn queue_capacity(&self) -> usize {
        1024
    }
}

/// Subscriber that queues data for an async [`Drain`].
///
/// Must be created inside a tokio runtime; the worker task lives until
/// [`QueueSubscriber::shutdown`] closes the queue.
pub struct QueueSubscriber<T> {
    name: &'static str,
    tx: mpsc::Sender<Arc<T>>,
    worker: JoinHandle<()>,
}

impl<T: Send + Sync + 'static> QueueSubscriber<T> {
    /// Creates the subscriber and spawns its worker task.
    #[must_use]
    pub fn new(drain: impl Drain<T>) -> Self {
        let drain = Arc::new(drain);
        let name = drain.name();
        let (tx, mut rx) = mpsc::channel::<Arc<T>>(drain.queue_capacity().max(1));

        let worker = tokio::spawn(async move {
            while let Some(data) = rx.recv().await {
                let fut = drain.on_data(data.as_ref());
                if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                    eprintln!("[pathbus] drain '{}' panicked: {:?}", drain.name(), panic_err);
                }
            }
        });

        Self { name, tx, worker }
    }

    /// Creates the subscriber and returns it as a shared handle.
    #[must_use]
    pub fn arc(drain: impl Drain<T>) -> SubscriberRef<T>
    where
        T: Clone,
    {
        Arc::new(Self::new(drain))
    }

    /// Graceful shutdown: close the queue and await the worker, which
    /// drains whatever was already queued.
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}

impl<T: Clone + Send + Sync + 'static> Subscribe<T> for QueueSubscriber<T> {
    fn write(&self, data: &T) {
        match self.tx.try_send(Arc::new(data.clone())) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                eprintln!("[pathbus] subscriber '{}' dropped data: queue full", self.name);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                eprintln!(
                    "[pathbus] subscriber '{}' dropped data: worker closed",
                    self.name
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Forward {
        tx: mpsc::UnboundedSender<String>,
    }

    #[async_trait]
    impl Drain<String> for Forward {
        async fn on_data(&self, data: &String) {
            let _ = self.tx.send(data.clone());
        }

        fn name(&self) -> &'static str {
            "forward"
        }
    }

    #[tokio::test]
    async fn forwards_written_data_to_the_drain() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let queue = QueueSubscriber::new(Forward { tx });

        queue.write(&"ping".to_string());

        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("drain should receive within the timeout");
        assert_eq!(got.as_deref(), Some("ping"));

        queue.shutdown().await;
    }
}
