//! Subscription handle (RxJS-like)

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new random subscription id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Cancellation side of an observer, with its value types erased
pub(crate) trait Unsubscribe: Send + Sync {
    fn id(&self) -> SubscriptionId;
    fn is_terminated(&self) -> bool;
    fn unsubscribe(&self);
}

/// Subscription handle - similar to RxJS Subscription
///
/// A thin proxy over the observer it came from. Dropping the handle does
/// not cancel the stream; call [`unsubscribe`](Self::unsubscribe).
#[derive(Clone)]
pub struct Subscription {
    observer: Arc<dyn Unsubscribe>,
}

impl Subscription {
    pub(crate) fn new(observer: Arc<dyn Unsubscribe>) -> Self {
        Self { observer }
    }

    pub fn id(&self) -> SubscriptionId {
        self.observer.id()
    }

    /// Unsubscribe from the observable
    pub fn unsubscribe(&self) {
        self.observer.unsubscribe();
    }

    /// Check if the stream completed, failed or was unsubscribed
    pub fn is_closed(&self) -> bool {
        self.observer.is_terminated()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id())
            .field("closed", &self.is_closed())
            .finish()
    }
}
