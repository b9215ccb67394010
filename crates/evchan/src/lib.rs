#![forbid(unsafe_code)]

//! Typed in-process event channels for evchan.
//!
//! This crate provides a synchronous publish/subscribe core for decoupling
//! producers from consumers inside one thread:
//!
//! - [`Channel`]: a broadcast primitive for one payload type.
//! - [`Subscription`]: RAII guard that unsubscribes its callback on drop.
//! - [`OpaqueSubscription`]: a subscription with its payload type erased.
//! - [`SubscriptionManager`]: owns subscriptions across many channel types
//!   and releases them as one group.
//!
//! # Architecture
//!
//! `Channel<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscriptions point back at their channel through a `Weak`, so a handle
//! that outlives its channel degrades to a no-op instead of dangling.
//! Channels are ordinary values: an application owns them in a context
//! struct and passes references to producers and consumers.
//!
//! # Invariants
//!
//! 1. Callbacks run in registration order, synchronously, on the caller's
//!    stack.
//! 2. Subscriber ids are unique per channel and never reused.
//! 3. A publish only reaches callbacks registered when it started.
//! 4. Dropping a [`Subscription`] removes its callback before the next
//!    publish.
//!
//! # Logging
//!
//! Subscribe and unsubscribe are reported as `tracing` debug events carrying
//! the channel name, subscriber id and label.

pub mod channel;
pub mod erased;
pub mod error;
pub mod manager;
pub mod subscription;

pub use channel::{Channel, ChannelConfig, SubscriberId};
pub use erased::OpaqueSubscription;
pub use error::EventError;
pub use manager::SubscriptionManager;
pub use subscription::Subscription;
