use thiserror::Error;

use crate::request::Method;

/// Stream error carried by the request source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{method} /{path} requires an id parameter")]
    MissingId { method: Method, path: String },

    #[error("{method} /{path} requires a body")]
    MissingBody { method: Method, path: String },

    #[error("Injected failure at request #{index}")]
    Injected { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display() {
        let err = RequestError::MissingId {
            method: Method::Get,
            path: "user".to_string(),
        };
        assert_eq!(err.to_string(), "GET /user requires an id parameter");

        let err = RequestError::Injected { index: 4 };
        assert!(err.to_string().contains("#4"));
    }
}
