#![forbid(unsafe_code)]

//! Group ownership of subscriptions across channels of different payload types.
//!
//! [`SubscriptionManager`] registers a callback on any `Channel<T>` and keeps
//! the resulting handle itself, type-erased. There is no per-entry removal:
//! everything the manager owns is released together when it is dropped.
//!
//! # Invariants
//!
//! 1. After the manager is dropped, none of the callbacks it registered is
//!    reachable from any channel.
//! 2. Release happens in registration order.

use tracing::debug;

use crate::channel::Channel;
use crate::erased::OpaqueSubscription;
use crate::subscription::Subscription;

/// Owns a heterogeneous group of subscriptions and releases them together.
///
/// # Example
///
/// ```
/// use evchan::{Channel, SubscriptionManager};
///
/// let temps = Channel::<f64>::named("temperature");
/// let doors = Channel::<bool>::named("door");
/// {
///     let mut manager = SubscriptionManager::new();
///     manager.subscribe(&temps, |t| println!("temp {t}"), "logger");
///     manager.subscribe(&doors, |open| println!("open {open}"), "logger");
///     assert_eq!(temps.subscriber_count(), 1);
///     assert_eq!(doors.subscriber_count(), 1);
/// }
/// assert!(temps.is_empty());
/// assert!(doors.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    subscriptions: Vec<OpaqueSubscription>,
}

impl SubscriptionManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty manager with room for `capacity` subscriptions.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscriptions: Vec::with_capacity(capacity),
        }
    }

    /// Subscribe `callback` to `channel` and keep the handle.
    pub fn subscribe<T, F>(&mut self, channel: &Channel<T>, callback: F, label: impl Into<String>)
    where
        T: 'static,
        F: Fn(&T) + 'static,
    {
        let subscription = channel.subscribe(callback, label);
        self.adopt(subscription);
    }

    /// Take ownership of a handle created elsewhere.
    pub fn adopt<T: 'static>(&mut self, subscription: Subscription<T>) {
        self.subscriptions.push(subscription.into_opaque());
    }

    /// Number of subscriptions held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the manager holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Labels of held subscriptions, in registration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.subscriptions.iter().map(OpaqueSubscription::label)
    }
}

impl Drop for SubscriptionManager {
    fn drop(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        debug!(count = self.subscriptions.len(), "releasing subscription group");
        for subscription in self.subscriptions.drain(..) {
            drop(subscription);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Reading {
        value: f64,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct DoorStatus {
        is_open: bool,
        sensor_id: i32,
    }

    #[test]
    fn drop_releases_every_channel() {
        let readings = Channel::<Reading>::new();
        let doors = Channel::<DoorStatus>::new();
        let hits = Rc::new(Cell::new(0u32));

        let mut manager = SubscriptionManager::new();
        for _ in 0..3 {
            let h = Rc::clone(&hits);
            manager.subscribe(
                &readings,
                move |r: &Reading| {
                    if r.value > 0.0 {
                        h.set(h.get() + 1);
                    }
                },
                "reading",
            );
        }
        let h = Rc::clone(&hits);
        manager.subscribe(
            &doors,
            move |d: &DoorStatus| {
                if !d.is_open && d.sensor_id == 1 {
                    h.set(h.get() + 1);
                }
            },
            "door",
        );

        assert_eq!(manager.len(), 4);
        assert_eq!(readings.subscriber_count(), 3);
        assert_eq!(doors.subscriber_count(), 1);

        readings.publish(Reading { value: 20.0 });
        doors.publish(DoorStatus {
            is_open: false,
            sensor_id: 1,
        });
        assert_eq!(hits.get(), 4);

        drop(manager);
        assert!(readings.is_empty());
        assert!(doors.is_empty());

        readings.publish(Reading { value: 30.0 });
        assert_eq!(hits.get(), 4);
    }

    #[test]
    fn subscriptions_outside_manager_survive() {
        let channel = Channel::<u8>::new();
        let _own = channel.subscribe(|_| {}, "own");
        {
            let mut manager = SubscriptionManager::with_capacity(1);
            manager.subscribe(&channel, |_| {}, "managed");
            assert_eq!(channel.subscriber_count(), 2);
        }
        assert_eq!(channel.labels(), vec!["own".to_string()]);
    }

    #[test]
    fn adopt_takes_ownership() {
        let channel = Channel::<u8>::new();
        let mut manager = SubscriptionManager::new();
        manager.adopt(channel.subscribe(|_| {}, "adopted"));
        assert_eq!(channel.subscriber_count(), 1);
        assert_eq!(manager.labels().collect::<Vec<_>>(), vec!["adopted"]);
        drop(manager);
        assert!(channel.is_empty());
    }

    struct DropLog(&'static str, Rc<RefCell<Vec<&'static str>>>);

    impl Drop for DropLog {
        fn drop(&mut self) {
            self.1.borrow_mut().push(self.0);
        }
    }

    #[test]
    fn release_order_is_registration_order() {
        let channel = Channel::<u8>::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SubscriptionManager::new();
        for label in ["first", "second", "third"] {
            let sentinel = DropLog(label, Rc::clone(&order));
            manager.subscribe(
                &channel,
                move |_| {
                    let _keep = &sentinel;
                },
                label,
            );
        }

        drop(manager);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
        assert!(channel.is_empty());
    }

    #[test]
    fn manager_outliving_channel_is_safe() {
        let channel = Channel::<u8>::new();
        let mut manager = SubscriptionManager::new();
        manager.subscribe(&channel, |_| {}, "orphaned");
        drop(channel);
        assert_eq!(manager.len(), 1);
        drop(manager);
    }

    #[test]
    fn empty_manager() {
        let manager = SubscriptionManager::new();
        assert!(manager.is_empty());
        assert_eq!(manager.labels().count(), 0);
    }
}
