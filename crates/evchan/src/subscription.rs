#![forbid(unsafe_code)]

//! Scope-bound ownership of one channel registration.
//!
//! A [`Subscription<T>`] is returned by [`Channel::subscribe`] and is the only
//! owner of the registration it names. It cannot be cloned. Dropping it
//! removes the callback from the channel on every exit path, including early
//! returns, `?` propagation and unwinding.
//!
//! # States
//!
//! | State     | Meaning                                  | Drop         |
//! |-----------|------------------------------------------|--------------|
//! | Active    | Bound to a live channel                  | Unsubscribes |
//! | Inert     | Cancelled, or the channel is already gone | No-op        |
//!
//! Moving a handle is a compile-time transfer: the moved-from binding can no
//! longer be used or dropped, so exactly one live handle maps to a given
//! `(channel, id)` pair.
//!
//! [`Channel::subscribe`]: crate::Channel::subscribe

use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

use tracing::trace;

use crate::channel::{ChannelInner, SubscriberId};
use crate::erased::OpaqueSubscription;
use crate::error::EventError;

/// RAII handle for one callback registered on a [`Channel<T>`](crate::Channel).
#[must_use = "dropping the subscription unsubscribes the callback"]
pub struct Subscription<T: 'static> {
    /// `None` once the handle has detached.
    channel: Option<Weak<RefCell<ChannelInner<T>>>>,
    id: SubscriberId,
    label: String,
}

impl<T: 'static> Subscription<T> {
    pub(crate) fn new(
        channel: Weak<RefCell<ChannelInner<T>>>,
        id: SubscriberId,
        label: String,
    ) -> Self {
        Self {
            channel: Some(channel),
            id,
            label,
        }
    }

    /// Id of the registration this handle owns.
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Diagnostic label given at subscribe time.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether dropping this handle would still remove a registration.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.channel
            .as_ref()
            .is_some_and(|channel| channel.strong_count() > 0)
    }

    /// Unsubscribe now instead of at end of scope.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::ChannelClosed`] if the channel was dropped before
    /// this handle. Nothing is left registered in that case either.
    pub fn cancel(mut self) -> Result<(), EventError> {
        self.detach()
    }

    /// Erase the payload type, keeping only the teardown behaviour.
    pub fn into_opaque(self) -> OpaqueSubscription {
        OpaqueSubscription::new(self)
    }

    /// Active -> Inert. Safe to call more than once.
    pub(crate) fn detach(&mut self) -> Result<(), EventError> {
        let Some(weak) = self.channel.take() else {
            return Ok(());
        };
        let Some(inner) = weak.upgrade() else {
            return Err(EventError::ChannelClosed {
                id: self.id,
                label: self.label.clone(),
            });
        };
        // Bind first so the entry drops after the borrow is released.
        let removed = inner.borrow_mut().remove(self.id);
        drop(removed);
        Ok(())
    }
}

impl<T: 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Err(err) = self.detach() {
            trace!(%err, "stale subscription dropped");
        }
    }
}

impl<T: 'static> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}
