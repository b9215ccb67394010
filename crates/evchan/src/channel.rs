#![forbid(unsafe_code)]

//! Typed broadcast channel with registration-order dispatch.
//!
//! # Design
//!
//! [`Channel<T>`] keeps its callback list in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Cloning a channel hands out another handle to
//! the **same** list. Each [`Subscription`] keeps only a `Weak` reference
//! back to that storage, so a handle never extends the channel's lifetime.
//!
//! # Performance
//!
//! | Operation       | Complexity                 |
//! |-----------------|----------------------------|
//! | `subscribe()`   | O(1) amortized             |
//! | `publish()`     | O(S) where S = subscribers |
//! | `unsubscribe()` | O(S) linear id search      |
//!
//! # Failure Modes
//!
//! - **Re-entrant subscribe/unsubscribe**: allowed. `publish()` snapshots the
//!   callback list and releases its borrow before calling anything, so a
//!   callback may subscribe, drop its own handle, or drop another handle.
//! - **Re-entrant publish**: allowed, and recursion depth is the caller's
//!   problem.
//! - **Channel dropped first**: outstanding handles turn inert. Dropping
//!   them is a no-op and [`Subscription::cancel`] reports
//!   [`EventError::ChannelClosed`](crate::EventError::ChannelClosed).
//! - **Reference cycles**: a callback that captures a clone of its own
//!   channel keeps the channel alive for as long as it stays subscribed.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, trace_span};

use crate::subscription::Subscription;

/// Callback stored by the channel. Shared so dispatch can snapshot it.
pub(crate) type Callback<T> = Rc<dyn Fn(&T)>;

/// Identifier of one registration on one channel.
///
/// Ids are assigned from a per-channel counter starting at 0. They increase
/// strictly and are never reused, even after the registration is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Channel configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Name used in log output.
    pub name: Cow<'static, str>,
    /// Pre-allocated slots in the callback list.
    pub initial_capacity: usize,
    /// Emit a `trace` event for every publish.
    pub log_dispatch: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("channel"),
            initial_capacity: 0,
            log_dispatch: false,
        }
    }
}

impl ChannelConfig {
    /// Set the diagnostic name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the number of callback slots reserved up front.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Enable or disable per-publish trace events.
    #[must_use]
    pub fn with_log_dispatch(mut self, enabled: bool) -> Self {
        self.log_dispatch = enabled;
        self
    }
}

/// One registered callback.
pub(crate) struct CallbackEntry<T> {
    pub(crate) id: SubscriberId,
    pub(crate) callback: Callback<T>,
    pub(crate) label: String,
}

impl<T> fmt::Debug for CallbackEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackEntry")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Shared interior for [`Channel<T>`].
pub(crate) struct ChannelInner<T> {
    config: ChannelConfig,
    next_id: u64,
    /// Kept in registration order; ids are therefore ascending.
    entries: Vec<CallbackEntry<T>>,
}

impl<T> ChannelInner<T> {
    pub(crate) fn name(&self) -> &str {
        &self.config.name
    }

    /// Remove the entry with `id`. Absent ids are ignored.
    ///
    /// The removed entry is handed back so the caller can drop it after the
    /// `RefCell` borrow ends: dropping a callback may drop captured handles
    /// that reach back into this channel.
    pub(crate) fn remove(&mut self, id: SubscriberId) -> Option<CallbackEntry<T>> {
        let pos = self.entries.iter().position(|entry| entry.id == id)?;
        let entry = self.entries.remove(pos);
        debug!(
            channel = %self.config.name,
            %id,
            label = %entry.label,
            remaining = self.entries.len(),
            "unsubscribe"
        );
        Some(entry)
    }
}

/// A typed, single-threaded broadcast channel.
///
/// Cloning a `Channel` creates a new handle to the **same** callback list.
///
/// # Invariants
///
/// 1. Ids are unique for the lifetime of the channel and strictly increasing.
/// 2. `publish` invokes callbacks in registration order.
/// 3. `publish` only invokes callbacks registered when it started; callbacks
///    removed mid-dispatch still run for that dispatch.
/// 4. Removing an id that is not registered is a no-op.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use evchan::Channel;
///
/// let channel = Channel::<u32>::named("ticks");
/// let seen = Rc::new(Cell::new(0));
/// let probe = Rc::clone(&seen);
/// let sub = channel.subscribe(move |v| probe.set(*v), "probe");
///
/// channel.publish(7);
/// assert_eq!(seen.get(), 7);
///
/// drop(sub);
/// channel.publish(9);
/// assert_eq!(seen.get(), 7);
/// ```
pub struct Channel<T: 'static> {
    inner: Rc<RefCell<ChannelInner<T>>>,
}

// Manual Clone: shares the same Rc and does not require `T: Clone`.
impl<T: 'static> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Channel")
            .field("name", &inner.config.name)
            .field("next_id", &inner.next_id)
            .field("entries", &inner.entries)
            .finish()
    }
}

impl<T: 'static> Channel<T> {
    /// Create a channel with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ChannelConfig::default())
    }

    /// Create a channel with a diagnostic name.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_config(ChannelConfig::default().with_name(name))
    }

    /// Create a channel from an explicit configuration.
    #[must_use]
    pub fn with_config(config: ChannelConfig) -> Self {
        let entries = Vec::with_capacity(config.initial_capacity);
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                config,
                next_id: 0,
                entries,
            })),
        }
    }

    /// Register `callback` and return the handle that owns the registration.
    ///
    /// `label` is diagnostic metadata only. Dropping the returned
    /// [`Subscription`] removes the callback again, so binding it to `_`
    /// unsubscribes immediately.
    #[must_use = "dropping the subscription unsubscribes the callback"]
    pub fn subscribe<F>(&self, callback: F, label: impl Into<String>) -> Subscription<T>
    where
        F: Fn(&T) + 'static,
    {
        let label = label.into();
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = SubscriberId(inner.next_id);
            inner.next_id += 1;
            inner.entries.push(CallbackEntry {
                id,
                callback: Rc::new(callback),
                label: label.clone(),
            });
            debug!(channel = %inner.config.name, %id, label = %label, "subscribe");
            id
        };
        Subscription::new(Rc::downgrade(&self.inner), id, label)
    }

    /// Broadcast `value` to every callback registered at the time of the call.
    ///
    /// Returns the number of callbacks invoked.
    pub fn publish(&self, value: T) -> usize {
        self.publish_ref(&value)
    }

    /// Broadcast a borrowed value. See [`publish`](Self::publish).
    pub fn publish_ref(&self, value: &T) -> usize {
        // Snapshot first so callbacks can mutate the list freely.
        let (snapshot, span) = {
            let inner = self.inner.borrow();
            let snapshot: Vec<Callback<T>> = inner
                .entries
                .iter()
                .map(|entry| Rc::clone(&entry.callback))
                .collect();
            if inner.config.log_dispatch {
                trace!(
                    channel = %inner.config.name,
                    subscribers = snapshot.len(),
                    "publish"
                );
            }
            (snapshot, trace_span!("publish", channel = %inner.config.name))
        };

        let _guard = span.enter();
        for callback in &snapshot {
            callback(value);
        }
        snapshot.len()
    }

    /// Remove the registration with `id`, returning whether it was present.
    pub(crate) fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.inner.borrow_mut().remove(id);
        removed.is_some()
    }

    /// Number of live registrations.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Labels of the live registrations, in registration order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|entry| entry.label.clone())
            .collect()
    }

    /// Id the next call to [`subscribe`](Self::subscribe) will assign.
    #[must_use]
    pub fn next_id(&self) -> SubscriberId {
        SubscriberId(self.inner.borrow().next_id)
    }

    /// Diagnostic name from the channel's configuration.
    #[must_use]
    pub fn name(&self) -> String {
        self.inner.borrow().name().to_owned()
    }

    /// Whether `self` and `other` share the same callback list.
    #[must_use]
    pub fn same_channel(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
