//! RxJS-style push streams
//!
//! A producer drives an [`Observer`] which gates every notification behind a
//! one-shot termination flag. The [`Subscription`] handed back by
//! [`Observable::subscribe`] is the cancellation handle.

pub mod handlers;
pub mod observable;
pub mod observer;
pub mod subscription;

pub use handlers::Handlers;
pub use observable::Observable;
pub use observer::{Observer, Teardown};
pub use subscription::{Subscription, SubscriptionId};
