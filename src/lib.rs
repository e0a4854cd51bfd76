//! # pathbus
//!
//! **pathbus** is an in-memory publish/subscribe engine with structured
//! routing.
//!
//! Subscriptions register against a hierarchical path in a trie; each
//! published datum is routed by a caller-supplied traverser that decides,
//! level by level, which child labels the datum matches. Subscriber and
//! publisher therefore jointly determine delivery: the one by where it
//! sits in the trie, the other by how the data walks it.
//!
//! ## Features
//!
//! | Area            | Description                                                          | Key types / traits                         |
//! |-----------------|----------------------------------------------------------------------|--------------------------------------------|
//! | **Registry**    | Subscribe at a path, publish through a traverser, unsubscribe.       | [`Bus`], [`Unsubscriber`]                  |
//! | **Subscribers** | Opaque receivers of published data, shared via `Arc`.                | [`Subscribe`], [`SubscriberRef`], [`SubscribeFn`] |
//! | **Traversers**  | Programmable routing: static paths or dynamic multi-way branching.   | [`Traverse`], [`LinearTraverser`], [`TraverseFn`], [`Branch`] |
//! | **Sharding**    | Deliver to exactly one member of a shard group, strategy pluggable.  | [`Sharding`], [`RandomSharding`], [`RoundRobinSharding`] |
//! | **Errors**      | Typed rejection of invalid subscription paths.                       | [`SubscribeError`]                         |
//! | **Configuration** | Locking discipline for reentrant callers.                          | [`Config`], [`SubscribeOptions`]           |
//!
//! ## Optional features
//! - `queue`: exports [`QueueSubscriber`] and [`Drain`] for handing data
//!   off to an async consumer outside the publish path.
//! - `logging`: exports a simple built-in [`LogSubscriber`] _(demo/reference only)_.
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! use pathbus::{Bus, Config, LinearTraverser, SubscribeFn, SubscribeOptions};
//!
//! let bus: Bus<String> = Bus::new(Config::default());
//!
//! let seen = Arc::new(AtomicUsize::new(0));
//! let writes = Arc::clone(&seen);
//! let subscriber = SubscribeFn::arc(move |_data: &String| {
//!     writes.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! let handle = bus.subscribe(subscriber, SubscribeOptions::at(["logs", "app"]))?;
//!
//! // The traverser walks past the subscription's node, so it is delivered.
//! bus.publish(
//!     &"payload".to_string(),
//!     &LinearTraverser::new(["logs", "app", "ignored"]),
//! );
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//!
//! handle.unsubscribe();
//! # Ok::<(), pathbus::SubscribeError>(())
//! ```
//!
//! ---

mod bus;
mod config;
mod error;
mod node;
mod publish;
mod sharding;
mod subscriber;
mod subscribers;
mod traverser;

// ---- Public re-exports ----

pub use bus::{Bus, Unsubscriber};
pub use config::{Config, SubscribeOptions};
pub use error::SubscribeError;
pub use sharding::{RandomSharding, RoundRobinSharding, Sharding, ShardingFn, ShardingRef};
pub use subscriber::{Subscribe, SubscribeFn, SubscriberRef};
pub use traverser::{
    branches, flat, stop, with_traverser, Branch, BranchIter, LinearTraverser, Traverse,
    TraverseFn, TraverserRef,
};

// Optional: hand data off to an async consumer outside the publish path.
// Enable with: `--features queue`
#[cfg(feature = "queue")]
pub use subscribers::{Drain, QueueSubscriber};

// Optional: expose a simple built-in logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogSubscriber;
