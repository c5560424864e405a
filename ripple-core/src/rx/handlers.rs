//! Consumer callbacks for a subscription

use std::fmt;

use crate::error::BoxError;

/// Callback invoked for every delivered value
pub type NextFn<T> = Box<dyn FnMut(T) + Send + 'static>;

/// Callback invoked once when the stream fails
pub type ErrorFn<E> = Box<dyn FnOnce(E) + Send + 'static>;

/// Callback invoked once when the stream finishes
pub type CompleteFn = Box<dyn FnOnce() + Send + 'static>;

/// Handler set - similar to a partial RxJS Observer
///
/// Every slot is optional. A missing slot is a valid state: the matching
/// notification is still gated and can still terminate the stream, it just
/// has nobody to tell.
///
/// # Example
/// ```
/// # use ripple_core::rx::Handlers;
/// let handlers: Handlers<u32> = Handlers::new()
///     .on_next(|value: u32| println!("Next: {value}"))
///     .on_complete(|| println!("Complete!"));
///
/// assert!(handlers.has_next());
/// assert!(!handlers.has_error());
/// ```
pub struct Handlers<T, E = BoxError> {
    pub(crate) next: Option<NextFn<T>>,
    pub(crate) error: Option<ErrorFn<E>>,
    pub(crate) complete: Option<CompleteFn>,
}

impl<T, E> Handlers<T, E> {
    /// Create an empty handler set
    pub fn new() -> Self {
        Self {
            next: None,
            error: None,
            complete: None,
        }
    }

    /// Set the `next` handler
    pub fn on_next<F>(mut self, next: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        self.next = Some(Box::new(next));
        self
    }

    /// Set the `error` handler
    pub fn on_error<F>(mut self, error: F) -> Self
    where
        F: FnOnce(E) + Send + 'static,
    {
        self.error = Some(Box::new(error));
        self
    }

    /// Set the `complete` handler
    pub fn on_complete<F>(mut self, complete: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.complete = Some(Box::new(complete));
        self
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn has_complete(&self) -> bool {
        self.complete.is_some()
    }
}

impl<T, E> Default for Handlers<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Handlers<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("next", &self.has_next())
            .field("error", &self.has_error())
            .field("complete", &self.has_complete())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_empty() {
        let handlers: Handlers<i32> = Handlers::default();
        assert!(!handlers.has_next());
        assert!(!handlers.has_error());
        assert!(!handlers.has_complete());
    }

    #[test]
    fn test_handlers_builder() {
        let handlers: Handlers<i32, String> = Handlers::new()
            .on_next(|_| {})
            .on_error(|_| {});

        assert!(handlers.has_next());
        assert!(handlers.has_error());
        assert!(!handlers.has_complete());
    }

    #[test]
    fn test_handlers_debug_shows_slots() {
        let handlers: Handlers<i32> = Handlers::new().on_complete(|| {});
        let debug = format!("{handlers:?}");
        assert_eq!(debug, "Handlers { next: false, error: false, complete: true }");
    }
}
