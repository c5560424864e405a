//! Observable implementation (RxJS-like)

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::handlers::Handlers;
use super::observer::{Observer, Teardown};
use super::subscription::Subscription;
use crate::error::BoxError;

type Producer<T, E> = dyn Fn(Observer<T, E>) -> Teardown + Send + Sync + 'static;

/// Observable - similar to RxJS Observable
///
/// Wraps a producer function. Nothing runs until [`subscribe`](Self::subscribe)
/// is called, and every subscription runs the producer again with its own
/// [`Observer`], so subscriptions never share state.
pub struct Observable<T, E = BoxError> {
    producer: Arc<Producer<T, E>>,
}

impl<T: Send + 'static, E: 'static> Observable<T, E> {
    /// Create an Observable from a producer function
    ///
    /// The producer receives the subscription's observer and returns the
    /// teardown to run when the subscription ends.
    ///
    /// # Example
    /// ```
    /// # use ripple_core::rx::{Handlers, Observable};
    /// let failing: Observable<u8, String> = Observable::new(|observer| {
    ///     observer.error("no data".to_string());
    ///     Box::new(|| {})
    /// });
    ///
    /// let subscription = failing.subscribe(
    ///     Handlers::new().on_error(|err: String| eprintln!("Error: {err}")),
    /// );
    /// assert!(subscription.is_closed());
    /// ```
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn(Observer<T, E>) -> Teardown + Send + Sync + 'static,
    {
        Self {
            producer: Arc::new(producer),
        }
    }

    /// Subscribe with a next/error/complete handler set (RxJS style)
    ///
    /// Runs the producer on the calling thread. For a synchronous producer
    /// every notification has been delivered by the time this returns.
    pub fn subscribe(&self, handlers: Handlers<T, E>) -> Subscription {
        let observer = Observer::new(handlers);
        debug!(subscription_id = %observer.id(), "subscription started");

        let teardown = (self.producer)(observer.clone());
        observer.set_teardown(teardown);

        observer.subscription()
    }

    /// Subscribe with only a next callback (simplified)
    pub fn subscribe_next<F>(&self, next: F) -> Subscription
    where
        F: FnMut(T) + Send + 'static,
    {
        self.subscribe(Handlers::new().on_next(next))
    }
}

impl<T, E> Observable<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: 'static,
{
    /// Create an Observable that replays a fixed sequence
    ///
    /// Each subscription synchronously emits every value in order, then
    /// completes.
    ///
    /// # Example
    /// ```
    /// # use ripple_core::rx::Observable;
    /// # use std::sync::{Arc, Mutex};
    /// let obs: Observable<i32> = Observable::from_values(vec![1, 2, 3]);
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// obs.subscribe_next(move |v| sink.lock().unwrap().push(v));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let values: Arc<[T]> = values.into_iter().collect();

        Self::new(move |observer: Observer<T, E>| {
            for value in values.iter() {
                if observer.is_terminated() {
                    break;
                }
                observer.next(value.clone());
            }
            observer.complete();

            let id = observer.id();
            Box::new(move || {
                debug!(subscription_id = %id, "unsubscribed");
            })
        })
    }
}

impl<T, E> FromIterator<T> for Observable<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: 'static,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl<T, E> From<Vec<T>> for Observable<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: 'static,
{
    fn from(values: Vec<T>) -> Self {
        Self::from_values(values)
    }
}

impl<T, E> Clone for Observable<T, E> {
    fn clone(&self) -> Self {
        Self {
            producer: Arc::clone(&self.producer),
        }
    }
}

impl<T, E> fmt::Debug for Observable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_construction_is_lazy() {
        let runs = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&runs);
        let obs: Observable<i32> = Observable::new(move |observer| {
            r.fetch_add(1, Ordering::SeqCst);
            observer.complete();
            Box::new(|| {})
        });

        assert_eq!(runs.load(Ordering::SeqCst), 0);

        obs.subscribe(Handlers::new());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_each_subscribe_runs_producer() {
        let runs = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&runs);
        let obs: Observable<i32> = Observable::new(move |_observer| {
            r.fetch_add(1, Ordering::SeqCst);
            Box::new(|| {})
        });

        let sub1 = obs.subscribe(Handlers::new());
        let sub2 = obs.clone().subscribe(Handlers::new());

        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_ne!(sub1.id(), sub2.id());

        sub1.unsubscribe();
        assert!(sub1.is_closed());
        assert!(!sub2.is_closed());
    }

    #[test]
    fn test_from_iterator_and_vec() {
        let count = Arc::new(AtomicUsize::new(0));

        let collected: Observable<i32> = (1..=4).collect();
        let c = Arc::clone(&count);
        collected.subscribe_next(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let converted: Observable<i32> = Observable::from(vec![5, 6]);
        let c = Arc::clone(&count);
        converted.subscribe_next(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(count.load(Ordering::SeqCst), 6);
    }
}
