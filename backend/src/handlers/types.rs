//! Gateway request/response envelopes
//!
//! The request handlers speak the shape of an HTTP gateway proxy event: the
//! body arrives as a JSON-encoded string, and path parameters as a flat
//! string map. Responses mirror that, with the body JSON-encoded again.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 200
pub const SC_OK: u16 = 200;
/// 201
pub const SC_CREATED: u16 = 201;
/// 400
pub const SC_BAD_REQUEST: u16 = 400;
/// 404
pub const SC_NOT_FOUND: u16 = 404;
/// 500
pub const SC_INTERNAL_SERVER_ERROR: u16 = 500;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Incoming gateway event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    /// Raw request body (itself JSON text)
    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub path_parameters: HashMap<String, String>,
}

impl GatewayRequest {
    /// Request carrying only a body
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            path_parameters: HashMap::new(),
        }
    }

    /// Request carrying only one path parameter
    pub fn with_path_parameter(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut path_parameters = HashMap::new();
        path_parameters.insert(name.into(), value.into());
        Self {
            body: None,
            path_parameters,
        }
    }

    /// Path parameter value, `None` if absent or empty
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Outgoing gateway response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    /// JSON-encoded payload
    pub body: String,
}

impl GatewayResponse {
    /// JSON response with the given status
    pub fn json(status_code: u16, body: String) -> Self {
        let mut headers = HashMap::new();
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// Error response wrapping an [`ErrorMessage`]
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        let error = ErrorMessage {
            message: message.into(),
            status_code,
        };
        // Two plain fields; serialization cannot fail
        let body = serde_json::to_string(&error).unwrap_or_default();
        Self::json(status_code, body)
    }

    /// Parse the body as an [`ErrorMessage`], if it is one
    pub fn error_message(&self) -> Option<ErrorMessage> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Error payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub message: String,
    pub status_code: u16,
}
