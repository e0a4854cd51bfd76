//! Optional delivery adapters built on the [`Subscribe`](crate::Subscribe)
//! capability.

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "queue")]
mod queue;

#[cfg(feature = "logging")]
pub use log::LogSubscriber;
#[cfg(feature = "queue")]
pub use queue::{Drain, QueueSubscriber};
