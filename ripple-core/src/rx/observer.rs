//! Observer implementation (RxJS-like)

use parking_lot::{Mutex, ReentrantMutex};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

use super::handlers::{CompleteFn, ErrorFn, Handlers, NextFn};
use super::subscription::{Subscription, SubscriptionId, Unsubscribe};
use crate::error::{BoxError, Result, RippleError};

/// Release logic returned by a producer, run at most once
pub type Teardown = Box<dyn FnOnce() + Send + 'static>;

/// Observer - the producer-facing side of a subscription
///
/// Wraps the consumer's [`Handlers`] and gates every notification behind a
/// termination flag. The stream moves `Active -> Terminated` exactly once,
/// through the first of [`error`](Self::error), [`complete`](Self::complete)
/// or [`unsubscribe`](Self::unsubscribe). Nothing reaches the handlers after
/// that, and the teardown runs on the first transition only.
///
/// Observers are cheap handles: clones share the same state, so a producer
/// may move one into a thread or task and keep emitting from there.
///
/// Handlers may call back into their own observer. A value emitted from
/// inside the `next` handler is queued and delivered once that handler
/// returns; `error`, `complete` and `unsubscribe` take effect immediately.
///
/// # Example
/// ```
/// # use ripple_core::rx::{Handlers, Observer};
/// # use std::sync::{Arc, Mutex};
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let observer: Observer<i32> = Observer::new(
///     Handlers::new().on_next(move |v| sink.lock().unwrap().push(v)),
/// );
///
/// observer.next(1);
/// observer.complete();
/// observer.next(2); // dropped
///
/// assert_eq!(*seen.lock().unwrap(), vec![1]);
/// assert!(observer.is_terminated());
/// ```
pub struct Observer<T, E = BoxError> {
    inner: Arc<ObserverInner<T, E>>,
}

struct ObserverInner<T, E> {
    id: SubscriptionId,
    /// Serializes deliveries across threads; re-entry from the delivering
    /// thread gets through and only touches the queue.
    delivery: ReentrantMutex<RefCell<Delivery<T>>>,
    terminal: Mutex<Terminal<E>>,
    terminated: AtomicBool,
    teardown: Mutex<Option<Teardown>>,
}

struct Delivery<T> {
    next: Option<NextFn<T>>,
    in_flight: bool,
    queued: VecDeque<T>,
}

struct Terminal<E> {
    error: Option<ErrorFn<E>>,
    complete: Option<CompleteFn>,
}

/// A `next` handler taken out of its slot while it runs.
///
/// Dropping it, also on unwind, puts the handler back unless the stream
/// terminated in the meantime.
struct InFlight<'a, T, E> {
    observer: &'a ObserverInner<T, E>,
    state: &'a RefCell<Delivery<T>>,
    next: Option<NextFn<T>>,
}

impl<T, E> Observer<T, E> {
    /// Create a new Observer around a handler set
    pub fn new(handlers: Handlers<T, E>) -> Self {
        let Handlers {
            next,
            error,
            complete,
        } = handlers;

        Self {
            inner: Arc::new(ObserverInner {
                id: SubscriptionId::new(),
                delivery: ReentrantMutex::new(RefCell::new(Delivery {
                    next,
                    in_flight: false,
                    queued: VecDeque::new(),
                })),
                terminal: Mutex::new(Terminal { error, complete }),
                terminated: AtomicBool::new(false),
                teardown: Mutex::new(None),
            }),
        }
    }

    /// Identifier of the subscription this observer serves
    pub fn id(&self) -> SubscriptionId {
        self.inner.id
    }

    /// Check if the stream already reached its terminal state
    pub fn is_terminated(&self) -> bool {
        self.inner.is_terminated()
    }

    /// Deliver a value to the `next` handler
    ///
    /// Dropped silently once the stream is terminated. A panic raised by the
    /// handler unwinds out of this call to the producer.
    pub fn next(&self, value: T) {
        let _ = self.try_next(value);
    }

    /// Deliver a value, reporting whether the stream was still open
    ///
    /// Returns [`RippleError::Terminated`] when the value was dropped, so an
    /// asynchronous producer can stop its loop instead of emitting into the
    /// void. A missing `next` handler is not an error.
    pub fn try_next(&self, value: T) -> Result<()> {
        if self.inner.is_terminated() {
            trace!(subscription_id = %self.inner.id, "dropping value after termination");
            return Err(RippleError::Terminated { id: self.inner.id });
        }

        let delivery = self.inner.delivery.lock();

        // Termination may have been claimed while we waited for the lock.
        if self.inner.is_terminated() {
            trace!(subscription_id = %self.inner.id, "dropping value after termination");
            return Err(RippleError::Terminated { id: self.inner.id });
        }

        let next = {
            let mut state = delivery.borrow_mut();
            if state.in_flight {
                trace!(subscription_id = %self.inner.id, "queueing value emitted by the next handler");
                state.queued.push_back(value);
                return Ok(());
            }
            match state.next.take() {
                Some(next) => {
                    state.in_flight = true;
                    next
                }
                None => return Ok(()),
            }
        };

        let mut in_flight = InFlight {
            observer: &*self.inner,
            state: &*delivery,
            next: Some(next),
        };

        let mut value = value;
        loop {
            trace!(subscription_id = %self.inner.id, "delivering value");
            in_flight.deliver(value);

            if self.inner.is_terminated() {
                break;
            }
            let queued = delivery.borrow_mut().queued.pop_front();
            match queued {
                Some(queued) => value = queued,
                None => break,
            }
        }

        Ok(())
    }

    /// Fail the stream: run the `error` handler, then tear down
    pub fn error(&self, err: E) {
        if !self.inner.claim_termination() {
            trace!(subscription_id = %self.inner.id, "dropping error after termination");
            return;
        }

        debug!(subscription_id = %self.inner.id, "subscription errored");

        self.inner.release_next();
        let error = self.inner.terminal.lock().error.take();
        if let Some(error) = error {
            error(err);
        }

        self.inner.run_teardown();
    }

    /// Finish the stream: run the `complete` handler, then tear down
    pub fn complete(&self) {
        if !self.inner.claim_termination() {
            trace!(subscription_id = %self.inner.id, "dropping completion after termination");
            return;
        }

        debug!(subscription_id = %self.inner.id, "subscription completed");

        self.inner.release_next();
        let complete = self.inner.terminal.lock().complete.take();
        if let Some(complete) = complete {
            complete();
        }

        self.inner.run_teardown();
    }

    /// Cancel the stream without notifying the consumer
    ///
    /// Safe to call any number of times; the teardown still runs at most once.
    pub fn unsubscribe(&self) {
        self.inner.unsubscribe();
    }

    /// Attach the producer's teardown
    ///
    /// If the stream already terminated (a synchronous producer that
    /// completed or failed before returning), the teardown runs right away.
    /// A teardown attached to an open stream that already has one is chained
    /// after it.
    pub(crate) fn set_teardown(&self, teardown: Teardown) {
        let mut slot = self.inner.teardown.lock();

        if self.inner.is_terminated() {
            drop(slot);
            teardown();
            return;
        }

        *slot = Some(match slot.take() {
            Some(previous) => Box::new(move || {
                previous();
                teardown();
            }),
            None => teardown,
        });
    }
}

impl<T: Send + 'static, E: 'static> Observer<T, E> {
    /// Cancellation handle sharing this observer's state
    pub(crate) fn subscription(&self) -> Subscription {
        let inner: Arc<dyn Unsubscribe> = self.inner.clone();
        Subscription::new(inner)
    }
}

impl<T, E> ObserverInner<T, E> {
    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    /// Atomic check-and-set of the termination flag.
    /// Returns true for the one caller that performed the transition.
    fn claim_termination(&self) -> bool {
        !self.terminated.swap(true, Ordering::AcqRel)
    }

    /// Drop the `next` handler and anything queued for it.
    ///
    /// Waits for a delivery running on another thread. A delivery running on
    /// this thread holds the handler itself and drops it when it returns.
    fn release_next(&self) {
        let released = {
            let delivery = self.delivery.lock();
            let mut state = delivery.borrow_mut();
            state.queued.clear();
            state.next.take()
        };
        drop(released);
    }

    fn unsubscribe(&self) {
        if self.claim_termination() {
            debug!(subscription_id = %self.id, "subscription unsubscribed");
        }
        self.run_teardown();
    }

    fn run_teardown(&self) {
        let teardown = self.teardown.lock().take();
        if let Some(teardown) = teardown {
            trace!(subscription_id = %self.id, "running teardown");
            teardown();
        }
    }
}

impl<T, E> InFlight<'_, T, E> {
    fn deliver(&mut self, value: T) {
        if let Some(next) = self.next.as_mut() {
            next(value);
        }
    }
}

impl<T, E> Drop for InFlight<'_, T, E> {
    fn drop(&mut self) {
        let retired = {
            let mut state = self.state.borrow_mut();
            state.in_flight = false;
            state.queued.clear();
            if self.observer.is_terminated() {
                self.next.take()
            } else {
                state.next = self.next.take();
                None
            }
        };
        drop(retired);
    }
}

impl<T: Send, E> Unsubscribe for ObserverInner<T, E> {
    fn id(&self) -> SubscriptionId {
        self.id
    }

    fn is_terminated(&self) -> bool {
        ObserverInner::is_terminated(self)
    }

    fn unsubscribe(&self) {
        ObserverInner::unsubscribe(self)
    }
}

impl<T, E> Clone for Observer<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for Observer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("id", &self.inner.id)
            .field("terminated", &self.inner.is_terminated())
            .finish()
    }
}
