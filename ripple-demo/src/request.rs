//! Mock HTTP requests and their handlers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::RequestError;

pub const HTTP_STATUS_OK: u16 = 200;
pub const HTTP_STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub age: u32,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub host: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<User>,
    pub params: Params,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl Request {
    /// Check the method-specific requirements
    pub fn validate(&self) -> Result<(), RequestError> {
        match self.method {
            Method::Get if self.params.id.is_none() => Err(RequestError::MissingId {
                method: self.method,
                path: self.path.clone(),
            }),
            Method::Post if self.body.is_none() => Err(RequestError::MissingBody {
                method: self.method,
                path: self.path.clone(),
            }),
            _ => Ok(()),
        }
    }
}

/// The requests the demo streams: create a user, then fetch one
pub fn mock_requests(host: &str) -> Vec<Request> {
    let user = User {
        name: "User Name".to_string(),
        age: 26,
        roles: vec!["user".to_string(), "admin".to_string()],
        created_at: Utc::now(),
        is_deleted: false,
    };

    vec![
        Request {
            method: Method::Post,
            host: host.to_string(),
            path: "user".to_string(),
            body: Some(user),
            params: Params::default(),
        },
        Request {
            method: Method::Get,
            host: host.to_string(),
            path: "user".to_string(),
            body: None,
            params: Params {
                id: Some("3f5h67s4s".to_string()),
            },
        },
    ]
}

pub fn handle_request(request: &Request) -> Response {
    match serde_json::to_string(request) {
        Ok(payload) => debug!(%payload, "request payload"),
        Err(e) => warn!("Failed to serialize request: {}", e),
    }
    info!(
        method = %request.method,
        host = %request.host,
        path = %request.path,
        "handled request"
    );

    Response {
        status: HTTP_STATUS_OK,
    }
}

pub fn handle_error(error: &RequestError) -> Response {
    warn!(%error, "request stream failed");

    Response {
        status: HTTP_STATUS_INTERNAL_SERVER_ERROR,
    }
}

pub fn handle_complete() {
    info!("complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_requests_are_valid() {
        let requests = mock_requests("service.example");

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[1].method, Method::Get);
        assert!(requests.iter().all(|r| r.host == "service.example"));
        assert!(requests.iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn test_validate_get_without_id() {
        let mut request = mock_requests("h").remove(1);
        request.params.id = None;

        assert_eq!(
            request.validate(),
            Err(RequestError::MissingId {
                method: Method::Get,
                path: "user".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_post_without_body() {
        let mut request = mock_requests("h").remove(0);
        request.body = None;

        assert!(matches!(
            request.validate(),
            Err(RequestError::MissingBody { .. })
        ));
    }

    #[test]
    fn test_handlers_status_codes() {
        let request = mock_requests("h").remove(0);

        let ok = handle_request(&request);
        assert_eq!(ok.status, HTTP_STATUS_OK);
        assert!(ok.is_success());

        let failed = handle_error(&RequestError::Injected { index: 0 });
        assert_eq!(failed.status, HTTP_STATUS_INTERNAL_SERVER_ERROR);
        assert!(!failed.is_success());
    }

    #[test]
    fn test_request_json_shape() {
        let request = mock_requests("h").remove(1);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["method"], "GET");
        assert_eq!(json["params"]["id"], "3f5h67s4s");
        assert!(json.get("body").is_none());
    }
}
