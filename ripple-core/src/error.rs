//! Error types for Ripple

use thiserror::Error;

use crate::rx::SubscriptionId;

/// Default stream error type carried by `Observer::error`
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Errors reported by the primitive itself.
///
/// Stream errors travel through `Observer::error` as values of the
/// observable's error type and never show up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RippleError {
    /// The subscription already ended, the notification was dropped
    #[error("Subscription {id} is terminated")]
    Terminated { id: SubscriptionId },
}

impl RippleError {
    /// Returns true if the notification was dropped because the stream ended
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminated_display() {
        let id = SubscriptionId::new();
        let err = RippleError::Terminated { id };
        let msg = err.to_string();
        assert!(msg.contains("terminated"));
        assert!(msg.contains(&id.to_string()));
        assert!(err.is_terminated());
    }

    #[test]
    fn test_box_error_from_string() {
        let err: BoxError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }
}
