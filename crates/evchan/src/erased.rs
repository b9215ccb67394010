#![forbid(unsafe_code)]

//! Type-erased subscriptions.
//!
//! [`OpaqueSubscription`] hides the payload type of a [`Subscription<T>`]
//! behind a small object-safe trait, so handles for `Channel<A>` and
//! `Channel<B>` can live in one collection. The only behaviour that survives
//! erasure is teardown (plus the id and label for diagnostics).

use std::fmt;

use crate::channel::SubscriberId;
use crate::error::EventError;
use crate::subscription::Subscription;

/// Teardown capability shared by every `Subscription<T>`.
pub(crate) trait ErasedSubscription {
    fn id(&self) -> SubscriberId;
    fn label(&self) -> &str;
    fn is_active(&self) -> bool;
    fn release(&mut self) -> Result<(), EventError>;
}

impl<T: 'static> ErasedSubscription for Subscription<T> {
    fn id(&self) -> SubscriberId {
        Subscription::id(self)
    }

    fn label(&self) -> &str {
        Subscription::label(self)
    }

    fn is_active(&self) -> bool {
        Subscription::is_active(self)
    }

    fn release(&mut self) -> Result<(), EventError> {
        self.detach()
    }
}

/// A subscription of any payload type. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes the callback"]
pub struct OpaqueSubscription {
    inner: Box<dyn ErasedSubscription>,
}

impl OpaqueSubscription {
    pub(crate) fn new<T: 'static>(subscription: Subscription<T>) -> Self {
        Self {
            inner: Box::new(subscription),
        }
    }

    /// Id of the wrapped registration (unique per channel only).
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.inner.id()
    }

    /// Diagnostic label of the wrapped registration.
    #[must_use]
    pub fn label(&self) -> &str {
        self.inner.label()
    }

    /// See [`Subscription::is_active`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// See [`Subscription::cancel`].
    ///
    /// # Errors
    ///
    /// Returns [`EventError::ChannelClosed`] if the channel is already gone.
    pub fn cancel(mut self) -> Result<(), EventError> {
        self.inner.release()
    }
}

impl<T: 'static> From<Subscription<T>> for OpaqueSubscription {
    fn from(subscription: Subscription<T>) -> Self {
        Self::new(subscription)
    }
}

impl fmt::Debug for OpaqueSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueSubscription")
            .field("id", &self.id())
            .field("label", &self.label())
            .field("active", &self.is_active())
            .finish()
    }
}
