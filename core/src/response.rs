//! Response classification.
//!
//! Turns a raw `HttpResponse` into either a parsed payload, the no-content
//! marker, or an `ApiError::Status` tagged with the matching `ErrorKind`.

use std::fmt;

use serde_json::Value;

use crate::error::{ApiError, ErrorKind};
use crate::http::HttpResponse;

/// A response body, parsed according to its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Json(_) => None,
            Payload::Text(text) => Some(text),
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Json(value) => write!(f, "{value}"),
            Payload::Text(text) => f.write_str(text),
        }
    }
}

/// Outcome of one API call: `None` when the server answered 204.
pub type ApiResult = Result<Option<Payload>, ApiError>;

const NO_CONTENT: u16 = 204;

/// Classify a response by status code and content type.
pub fn classify(response: HttpResponse) -> ApiResult {
    if response.status == NO_CONTENT {
        return Ok(None);
    }
    let status = response.status;
    let success = matches!(status, 200..=202);
    let payload = decode_body(response, success)?;
    if success {
        return Ok(Some(payload));
    }
    Err(ApiError::Status {
        kind: ErrorKind::from_status(status),
        status,
        payload,
    })
}

/// Parse the body per its content type. A failure status with a malformed
/// JSON body keeps the raw text so its classification survives.
fn decode_body(response: HttpResponse, strict: bool) -> Result<Payload, ApiError> {
    let is_json = response
        .header("content-type")
        .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"));
    if !is_json {
        return Ok(Payload::Text(response.body));
    }
    match serde_json::from_str(&response.body) {
        Ok(value) => Ok(Payload::Json(value)),
        Err(err) if strict => Err(ApiError::Deserialization(err)),
        Err(_) => Ok(Payload::Text(response.body)),
    }
}
