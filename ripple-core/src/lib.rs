//! # Ripple
//!
//! A minimal push-based reactive stream primitive.
//!
//! An [`Observable`] describes how to produce values. Subscribing to it
//! builds an [`Observer`] around the caller's [`Handlers`], runs the producer
//! with that observer and hands back a [`Subscription`] that can cancel the
//! stream.
//!
//! ## Quick Start
//!
//! ```rust
//! use ripple_core::rx::{Handlers, Observable};
//!
//! let numbers: Observable<i32> = Observable::from_values(vec![1, 2, 3]);
//!
//! let subscription = numbers.subscribe(
//!     Handlers::new()
//!         .on_next(|value: i32| println!("Next: {value}"))
//!         .on_error(|err: ripple_core::BoxError| eprintln!("Error: {err}"))
//!         .on_complete(|| println!("Complete!")),
//! );
//!
//! // Already completed; this is a no-op.
//! subscription.unsubscribe();
//! ```

pub mod error;
pub mod rx;

pub use error::{BoxError, Result, RippleError};
pub use rx::{Handlers, Observable, Observer, Subscription, SubscriptionId, Teardown};
